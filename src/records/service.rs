//! Record store coordinating media storage and database operations.

use std::path::Path;

use mintari_common::{Error, ImageRecordId, Result};
use mintari_db::models::ImageRecord;
use mintari_db::pool::{get_conn, DbPool};
use mintari_db::queries::image_records;

use super::storage::MediaStorage;

/// High-level record store that pairs stored files with database rows.
#[derive(Clone)]
pub struct RecordStore {
    storage: MediaStorage,
    pool: DbPool,
}

impl RecordStore {
    /// Create a new `RecordStore`.
    ///
    /// # Arguments
    ///
    /// * `storage` - The media root layout
    /// * `pool` - Database connection pool
    pub fn new(storage: MediaStorage, pool: DbPool) -> Self {
        Self { storage, pool }
    }

    /// The media layout backing this store.
    pub fn storage(&self) -> &MediaStorage {
        &self.storage
    }

    /// Store an uploaded original and create its record.
    ///
    /// The only check is that a non-empty file was provided. The returned
    /// record has no transformed reference yet.
    pub fn create(&self, file_name: &str, data: &[u8]) -> Result<ImageRecord> {
        if data.is_empty() {
            return Err(Error::invalid_input("no file was provided"));
        }

        let stored = self.storage.store_original(file_name, data)?;
        let conn = get_conn(&self.pool)?;
        let record = image_records::insert_record(&conn, &stored.reference)?;

        tracing::info!(
            record_id = %record.id,
            original = %record.original_reference,
            bytes = data.len(),
            "Created image record"
        );

        Ok(record)
    }

    /// Record the stylized derivative of `record`.
    ///
    /// `transformed` is a path under the media root; it is stored as a
    /// root-relative reference.
    pub fn update_transformed(
        &self,
        record: &ImageRecord,
        transformed: &Path,
    ) -> Result<ImageRecord> {
        let reference = self.storage.reference_for(transformed)?;
        if reference == record.original_reference {
            return Err(Error::invalid_input(
                "transformed image must differ from the original",
            ));
        }

        let conn = get_conn(&self.pool)?;
        let updated = image_records::set_transformed_reference(&conn, record.id, &reference)?;

        tracing::info!(
            record_id = %updated.id,
            transformed = %reference,
            "Stored transformed reference"
        );

        Ok(updated)
    }

    /// Look up a record by ID.
    pub fn get(&self, id: ImageRecordId) -> Result<Option<ImageRecord>> {
        let conn = get_conn(&self.pool)?;
        image_records::get_record(&conn, id)
    }

    /// Most recent records, newest first.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<ImageRecord>> {
        let conn = get_conn(&self.pool)?;
        image_records::list_records(&conn, limit)
    }
}
