use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::db::store::{QrCodeStore, StoreError};
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};

const COLLECTION: &str = "qr_codes";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoQrCodeStore {
    db: Database,
    qr_codes: Collection<QrCodeRecord>,
}

impl MongoQrCodeStore {
    pub fn new(db: Database) -> Self {
        let qr_codes = db.collection::<QrCodeRecord>(COLLECTION);
        Self { db, qr_codes }
    }

    /// Create the indexes the store relies on. Safe to call on every start.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_short_code = IndexModel::builder()
            .keys(doc! { "short_code": 1 })
            .options(
                IndexOptions::builder()
                    .name("short_code_unique".to_string())
                    .unique(true)
                    // Static codes store a null short code
                    .partial_filter_expression(doc! { "short_code": { "$type": "string" } })
                    .build(),
            )
            .build();
        let by_owner = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "created_at": -1 })
            .build();

        self.qr_codes
            .create_indexes([unique_short_code, by_owner])
            .await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl QrCodeStore for MongoQrCodeStore {
    async fn create(&self, record: &QrCodeRecord) -> Result<ObjectId, StoreError> {
        let result = self.qr_codes.insert_one(record).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateShortCode
            } else {
                StoreError::Database(e)
            }
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("inserted id is not an ObjectId".to_string()))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<QrCodeRecord>, StoreError> {
        Ok(self.qr_codes.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<QrCodeRecord>, StoreError> {
        Ok(self
            .qr_codes
            .find_one(doc! { "short_code": short_code })
            .await?)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<QrCodeRecord>, StoreError> {
        let records = self
            .qr_codes
            .find(doc! { "owner_id": owner_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect::<Vec<QrCodeRecord>>()
            .await?;
        Ok(records)
    }

    async fn update(&self, id: &ObjectId, update: &QrCodeUpdate) -> Result<bool, StoreError> {
        let mut set = Document::new();
        set.insert("updated_at", update.updated_at);
        if let Some(name) = &update.name {
            set.insert("name", name.clone());
        }
        if let Some(redirect_url) = &update.redirect_url {
            set.insert("redirect_url", redirect_url.clone());
        }
        if let Some(is_active) = update.is_active {
            set.insert("is_active", is_active);
        }

        let result = self
            .qr_codes
            .update_one(doc! { "_id": *id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn record_scan(
        &self,
        id: &ObjectId,
        scan_count: i64,
        last_scanned_at: i64,
    ) -> Result<(), StoreError> {
        self.qr_codes
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "scan_count": scan_count, "last_scanned_at": last_scanned_at } },
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.qr_codes.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
