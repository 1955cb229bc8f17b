use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// The payload kinds a QR code can carry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrType {
    Url,
    Text,
    #[serde(rename = "vcard")]
    VCard,
    Email,
    Phone,
    Wifi,
}

impl QrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrType::Url => "url",
            QrType::Text => "text",
            QrType::VCard => "vcard",
            QrType::Email => "email",
            QrType::Phone => "phone",
            QrType::Wifi => "wifi",
        }
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(QrType::Url),
            "text" => Ok(QrType::Text),
            "vcard" => Ok(QrType::VCard),
            "email" => Ok(QrType::Email),
            "phone" => Ok(QrType::Phone),
            "wifi" => Ok(QrType::Wifi),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }
}
