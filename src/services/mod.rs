pub mod formatter;
pub mod qr_codes;
pub mod renderer;
pub mod resolver;
pub mod validator;
