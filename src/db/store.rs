use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique index on `short_code` rejected the insert.
    #[error("short code already in use")]
    DuplicateShortCode,

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Backend(String),
}

/// Persistence for QR code records.
#[async_trait]
pub trait QrCodeStore: Send + Sync {
    /// Insert a record and return the id assigned to it.
    async fn create(&self, record: &QrCodeRecord) -> Result<ObjectId, StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<QrCodeRecord>, StoreError>;

    async fn find_by_short_code(&self, short_code: &str)
    -> Result<Option<QrCodeRecord>, StoreError>;

    /// All records of one owner, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<QrCodeRecord>, StoreError>;

    /// Apply an owner edit. Returns `false` when no record has `id`.
    async fn update(&self, id: &ObjectId, update: &QrCodeUpdate) -> Result<bool, StoreError>;

    /// Overwrite the scan counters. Last write wins.
    async fn record_scan(
        &self,
        id: &ObjectId,
        scan_count: i64,
        last_scanned_at: i64,
    ) -> Result<(), StoreError>;

    /// Returns `false` when no record has `id`.
    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
