use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::qr_type::QrType;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QrCodeRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: String,
    pub name: String,
    pub qr_type: QrType,
    pub content: String, // Exactly what is encoded in the symbol; the short URL for dynamic codes
    pub is_dynamic: bool,
    pub short_code: Option<String>,
    pub redirect_url: Option<String>, // Current destination of a dynamic code
    pub is_active: bool,
    #[serde(default)]
    pub scan_count: i64,
    #[serde(default)]
    pub last_scanned_at: Option<i64>,
    pub created_at: i64, // Milliseconds since the epoch
    pub updated_at: i64,
}

impl QrCodeRecord {
    /// A static code: the formatted payload is encoded directly.
    pub fn new_static(owner_id: String, name: String, qr_type: QrType, content: String) -> Self {
        Self::new(owner_id, name, qr_type, content, None)
    }

    /// A dynamic code: the symbol carries `short_url`, scans are forwarded to `redirect_url`.
    pub fn new_dynamic(
        owner_id: String,
        name: String,
        qr_type: QrType,
        short_code: String,
        short_url: String,
        redirect_url: String,
    ) -> Self {
        Self::new(
            owner_id,
            name,
            qr_type,
            short_url,
            Some((short_code, redirect_url)),
        )
    }

    fn new(
        owner_id: String,
        name: String,
        qr_type: QrType,
        content: String,
        dynamic: Option<(String, String)>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let is_dynamic = dynamic.is_some();
        let (short_code, redirect_url) = match dynamic {
            Some((code, url)) => (Some(code), Some(url)),
            None => (None, None),
        };

        Self {
            id: None,
            owner_id,
            name,
            qr_type,
            content,
            is_dynamic,
            short_code,
            redirect_url,
            is_active: true,
            scan_count: 0,
            last_scanned_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Owner-editable fields. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QrCodeUpdate {
    pub name: Option<String>,
    pub redirect_url: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: i64,
}

impl QrCodeUpdate {
    pub fn apply_to(&self, record: &mut QrCodeRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(redirect_url) = &self.redirect_url {
            record.redirect_url = Some(redirect_url.clone());
        }
        if let Some(is_active) = self.is_active {
            record.is_active = is_active;
        }
        record.updated_at = self.updated_at;
    }
}
