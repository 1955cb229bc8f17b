//! In-process [`QrCodeStore`] used by the test suites.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::store::{QrCodeStore, StoreError};
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};

#[derive(Default)]
pub struct InMemoryQrCodeStore {
    records: RwLock<Vec<QrCodeRecord>>,
    forced_duplicates: AtomicUsize,
    scan_writes: AtomicUsize,
    fail_scans: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryQrCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` inserts as short-code collisions.
    pub fn force_duplicates(&self, n: usize) {
        self.forced_duplicates.store(n, Ordering::SeqCst);
    }

    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of `record_scan` calls that reached the store.
    pub fn scan_writes(&self) -> usize {
        self.scan_writes.load(Ordering::SeqCst)
    }

    /// Insert a record as-is, bypassing the creation flow.
    pub async fn seed(&self, record: QrCodeRecord) -> ObjectId {
        let id = record.id.unwrap_or_else(ObjectId::new);
        let mut record = record;
        record.id = Some(id);
        self.records.write().await.push(record);
        id
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("reads disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QrCodeStore for InMemoryQrCodeStore {
    async fn create(&self, record: &QrCodeRecord) -> Result<ObjectId, StoreError> {
        let forced = self
            .forced_duplicates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if forced.is_ok() {
            return Err(StoreError::DuplicateShortCode);
        }

        let mut records = self.records.write().await;
        if let Some(code) = &record.short_code {
            if records
                .iter()
                .any(|r| r.short_code.as_deref() == Some(code.as_str()))
            {
                return Err(StoreError::DuplicateShortCode);
            }
        }

        let id = ObjectId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        records.push(stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<QrCodeRecord>, StoreError> {
        self.check_reads()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<QrCodeRecord>, StoreError> {
        self.check_reads()?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.short_code.as_deref() == Some(short_code))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<QrCodeRecord>, StoreError> {
        self.check_reads()?;
        let records = self.records.read().await;
        let mut owned: Vec<QrCodeRecord> = records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, id: &ObjectId, update: &QrCodeUpdate) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id.as_ref() == Some(id)) {
            Some(record) => {
                update.apply_to(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_scan(
        &self,
        id: &ObjectId,
        scan_count: i64,
        last_scanned_at: i64,
    ) -> Result<(), StoreError> {
        self.scan_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("scan writes disabled".to_string()));
        }

        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id.as_ref() == Some(id)) {
            record.scan_count = scan_count;
            record.last_scanned_at = Some(last_scanned_at);
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id.as_ref() != Some(id));
        Ok(records.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reads()
    }
}
