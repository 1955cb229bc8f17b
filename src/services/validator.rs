//! Best-effort field validation for QR code forms. The first failing rule wins.

use thiserror::Error;
use validator::ValidateUrl;

use crate::models::payload::{
    EmailData, PhoneData, QrPayload, TextData, UrlData, VCardData, WifiData, WifiEncryption,
};
use crate::models::qr_type::QrType;
use crate::services::formatter::normalize_url;

/// Maximum text length in UTF-16 code units, the same unit browsers count in.
pub const MAX_TEXT_LENGTH: usize = 1000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL is required")]
    UrlRequired,
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Text is required")]
    TextRequired,
    #[error("Text is too long (maximum 1000 characters)")]
    TextTooLong,
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Last name is required")]
    LastNameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Network name (SSID) is required")]
    SsidRequired,
    #[error("Password is required for protected networks")]
    PasswordRequired,
    #[error("Name is required")]
    NameRequired,
    #[error("Destination is required")]
    DestinationRequired,
}

pub fn validate_payload(payload: &QrPayload) -> Result<(), ValidationError> {
    match payload {
        QrPayload::Url(data) => validate_url_data(data),
        QrPayload::Text(data) => validate_text_data(data),
        QrPayload::VCard(data) => validate_vcard_data(data),
        QrPayload::Email(data) => validate_email_data(data),
        QrPayload::Phone(data) => validate_phone_data(data),
        QrPayload::Wifi(data) => validate_wifi_data(data),
    }
}

pub fn validate_url_data(data: &UrlData) -> Result<(), ValidationError> {
    require(&data.url, ValidationError::UrlRequired)?;
    if !normalize_url(&data.url).validate_url() {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

pub fn validate_text_data(data: &TextData) -> Result<(), ValidationError> {
    require(&data.text, ValidationError::TextRequired)?;
    if data.text.encode_utf16().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong);
    }
    Ok(())
}

pub fn validate_vcard_data(data: &VCardData) -> Result<(), ValidationError> {
    require(&data.first_name, ValidationError::FirstNameRequired)?;
    require(&data.last_name, ValidationError::LastNameRequired)
}

pub fn validate_email_data(data: &EmailData) -> Result<(), ValidationError> {
    require(&data.email, ValidationError::EmailRequired)?;
    if !is_simple_email(&data.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_phone_data(data: &PhoneData) -> Result<(), ValidationError> {
    require(&data.phone, ValidationError::PhoneRequired)
}

pub fn validate_wifi_data(data: &WifiData) -> Result<(), ValidationError> {
    require(&data.ssid, ValidationError::SsidRequired)?;
    if data.encryption != WifiEncryption::NoPass {
        require(
            data.password.as_deref().unwrap_or_default(),
            ValidationError::PasswordRequired,
        )?;
    }
    Ok(())
}

/// Checks a new destination for a dynamic code and returns the value to store.
///
/// URL-typed codes get the same normalization as at creation time; other kinds
/// keep the trimmed input.
pub fn validate_redirect_url(qr_type: QrType, redirect_url: &str) -> Result<String, ValidationError> {
    require(redirect_url, ValidationError::DestinationRequired)?;
    if qr_type != QrType::Url {
        return Ok(redirect_url.trim().to_string());
    }

    let normalized = normalize_url(redirect_url);
    if !normalized.validate_url() {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(normalized)
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    require(name, ValidationError::NameRequired)
}

fn require(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain part.
fn is_simple_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
