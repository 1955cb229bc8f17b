use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fmt;

use crate::errors::AppError;
use crate::models::qr_type::QrType;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UrlData {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TextData {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct VCardData {
    pub first_name: String,
    pub last_name: String,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EmailData {
    pub email: String,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PhoneData {
    pub phone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl fmt::Display for WifiEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WifiEncryption::Wpa => f.write_str("WPA"),
            WifiEncryption::Wep => f.write_str("WEP"),
            WifiEncryption::NoPass => f.write_str("nopass"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WifiData {
    pub ssid: String,
    pub password: Option<String>,
    pub encryption: WifiEncryption,
    pub hidden: bool,
}

/// Typed form data for one QR code, tagged by its kind.
///
/// On the wire this is `{"type": "<kind>", "data": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum QrPayload {
    Url(UrlData),
    Text(TextData),
    #[serde(rename = "vcard")]
    VCard(VCardData),
    Email(EmailData),
    Phone(PhoneData),
    Wifi(WifiData),
}

impl QrPayload {
    /// Builds a payload from a loosely typed `type` string and JSON data.
    ///
    /// Unknown kinds fail with [`AppError::UnsupportedType`]; data that does not
    /// fit the kind's shape fails with [`AppError::MalformedPayload`].
    pub fn from_parts(kind: &str, data: serde_json::Value) -> Result<Self, AppError> {
        let qr_type: QrType = kind.parse()?;
        let payload = match qr_type {
            QrType::Url => QrPayload::Url(decode(qr_type, data)?),
            QrType::Text => QrPayload::Text(decode(qr_type, data)?),
            QrType::VCard => QrPayload::VCard(decode(qr_type, data)?),
            QrType::Email => QrPayload::Email(decode(qr_type, data)?),
            QrType::Phone => QrPayload::Phone(decode(qr_type, data)?),
            QrType::Wifi => QrPayload::Wifi(decode(qr_type, data)?),
        };
        Ok(payload)
    }

    pub fn qr_type(&self) -> QrType {
        match self {
            QrPayload::Url(_) => QrType::Url,
            QrPayload::Text(_) => QrType::Text,
            QrPayload::VCard(_) => QrType::VCard,
            QrPayload::Email(_) => QrType::Email,
            QrPayload::Phone(_) => QrType::Phone,
            QrPayload::Wifi(_) => QrType::Wifi,
        }
    }
}

fn decode<T: DeserializeOwned>(qr_type: QrType, data: serde_json::Value) -> Result<T, AppError> {
    // Absent data behaves like an empty form so the validator can name the missing field.
    let data = if data.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        data
    };
    serde_json::from_value(data)
        .map_err(|e| AppError::MalformedPayload(format!("invalid {} data: {}", qr_type, e)))
}
