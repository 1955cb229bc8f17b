//! Owner-facing flows: create, edit, delete, list, stats and download.

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use crate::config::app_config::AppConfig;
use crate::db::store::{QrCodeStore, StoreError};
use crate::errors::AppError;
use crate::models::payload::QrPayload;
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};
use crate::services::formatter::format_content;
use crate::services::renderer::{DownloadFormat, RenderedQr, render_qr};
use crate::services::validator::{validate_name, validate_payload, validate_redirect_url};
use crate::utils::short_code::generate_short_code;
use crate::utils::short_url::short_url;

#[derive(Debug, Clone)]
pub struct NewQrCode {
    pub name: String,
    pub payload: QrPayload,
    pub is_dynamic: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QrCodeEdit {
    pub name: Option<String>,
    pub redirect_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerStats {
    pub total: usize,
    pub active: usize,
    pub scans: i64,
}

/// Validate and format a payload without storing anything.
pub fn preview(payload: &QrPayload) -> Result<String, AppError> {
    validate_payload(payload)?;
    Ok(format_content(payload))
}

pub async fn create_qr_code(
    store: &dyn QrCodeStore,
    config: &AppConfig,
    owner_id: &str,
    new: NewQrCode,
) -> Result<QrCodeRecord, AppError> {
    validate_name(&new.name)?;
    let content = preview(&new.payload)?;
    let qr_type = new.payload.qr_type();
    let name = new.name.trim().to_string();

    if !new.is_dynamic {
        let mut record = QrCodeRecord::new_static(owner_id.to_string(), name, qr_type, content);
        record.id = Some(store.create(&record).await?);
        info!("Created static {} QR code for {}", qr_type, owner_id);
        return Ok(record);
    }

    for attempt in 1..=config.short_code_attempts {
        let code = generate_short_code();
        let mut record = QrCodeRecord::new_dynamic(
            owner_id.to_string(),
            name.clone(),
            qr_type,
            code.clone(),
            short_url(&config.base_url, &code),
            content.clone(),
        );

        match store.create(&record).await {
            Ok(id) => {
                record.id = Some(id);
                info!("Created dynamic {} QR code {} for {}", qr_type, code, owner_id);
                return Ok(record);
            }
            Err(StoreError::DuplicateShortCode) => {
                warn!(
                    "Short code collision on attempt {}/{}",
                    attempt, config.short_code_attempts
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::ShortCodeExhausted)
}

/// Fetch a record and check that `owner_id` owns it.
pub async fn get_owned(
    store: &dyn QrCodeStore,
    owner_id: &str,
    id: &ObjectId,
) -> Result<QrCodeRecord, AppError> {
    let record = store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    if !record.is_owned_by(owner_id) {
        return Err(AppError::Forbidden);
    }
    Ok(record)
}

pub async fn list_qr_codes(
    store: &dyn QrCodeStore,
    owner_id: &str,
    filter: &ListFilter,
) -> Result<Vec<QrCodeRecord>, AppError> {
    let records = store.list_by_owner(owner_id).await?;

    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let matching = records.into_iter().filter(|record| match &needle {
        Some(needle) => record.name.to_lowercase().contains(needle),
        None => true,
    });

    Ok(match filter.limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    })
}

pub async fn owner_stats(store: &dyn QrCodeStore, owner_id: &str) -> Result<OwnerStats, AppError> {
    let records = store.list_by_owner(owner_id).await?;
    Ok(OwnerStats {
        total: records.len(),
        active: records.iter().filter(|r| r.is_active).count(),
        scans: records.iter().map(|r| r.scan_count).sum(),
    })
}

/// Edit the mutable fields of a dynamic code. Static codes are immutable.
pub async fn edit_qr_code(
    store: &dyn QrCodeStore,
    owner_id: &str,
    id: &ObjectId,
    edit: QrCodeEdit,
) -> Result<QrCodeRecord, AppError> {
    let record = get_owned(store, owner_id, id).await?;
    if !record.is_dynamic {
        return Err(AppError::StaticImmutable);
    }

    let name = match edit.name {
        Some(name) => {
            validate_name(&name)?;
            Some(name.trim().to_string())
        }
        None => None,
    };
    let redirect_url = match edit.redirect_url {
        Some(url) => Some(validate_redirect_url(record.qr_type, &url)?),
        None => None,
    };

    let update = QrCodeUpdate {
        name,
        redirect_url,
        is_active: edit.is_active,
        updated_at: chrono::Utc::now().timestamp_millis(),
    };
    if !store.update(id, &update).await? {
        return Err(AppError::NotFound);
    }

    let mut updated = record;
    update.apply_to(&mut updated);
    info!("Updated QR code {}", id);
    Ok(updated)
}

pub async fn delete_qr_code(
    store: &dyn QrCodeStore,
    owner_id: &str,
    id: &ObjectId,
) -> Result<(), AppError> {
    get_owned(store, owner_id, id).await?;
    if !store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!("Deleted QR code {}", id);
    Ok(())
}

pub async fn download_qr_code(
    store: &dyn QrCodeStore,
    owner_id: &str,
    id: &ObjectId,
    format: DownloadFormat,
    size: u32,
) -> Result<RenderedQr, AppError> {
    let record = get_owned(store, owner_id, id).await?;
    Ok(render_qr(&record.content, &record.name, format, size)?)
}
