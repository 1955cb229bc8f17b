use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::qr_code::QrCodeRecord;
use crate::models::qr_type::QrType;
use crate::services::qr_codes::OwnerStats;
use crate::services::renderer::DownloadFormat;

#[derive(Deserialize, Validate)]
pub struct CreateQrRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub qr_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub is_dynamic: bool,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    #[serde(rename = "type")]
    pub qr_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub content: String,
}

/// Edit a dynamic QR code. Absent fields are left unchanged.
#[derive(Deserialize, Validate)]
pub struct UpdateQrRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2048, message = "Destination is too long"))]
    pub redirect_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub format: DownloadFormat,
    pub size: Option<u32>,
}

#[derive(Serialize)]
pub struct QrCodeResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub qr_type: QrType,
    pub content: String,
    pub is_dynamic: bool,
    pub short_code: Option<String>,
    pub redirect_url: Option<String>,
    pub is_active: bool,
    pub scan_count: i64,
    pub last_scanned_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<QrCodeRecord> for QrCodeResponse {
    fn from(record: QrCodeRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: record.name,
            qr_type: record.qr_type,
            content: record.content,
            is_dynamic: record.is_dynamic,
            short_code: record.short_code,
            redirect_url: record.redirect_url,
            is_active: record.is_active,
            scan_count: record.scan_count,
            last_scanned_at: record.last_scanned_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub active: usize,
    pub scans: i64,
}

impl From<OwnerStats> for StatsResponse {
    fn from(stats: OwnerStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            scans: stats.scans,
        }
    }
}
