pub mod payload;
pub mod qr_code;
pub mod qr_type;
