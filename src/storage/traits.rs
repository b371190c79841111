//! The record sink interface.

use async_trait::async_trait;

use crate::check::CheckRecord;
use crate::storage::StorageError;

/// Append-only store of check records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Prepare the backing store. Safe to call more than once.
    async fn init(&self) -> Result<(), StorageError>;

    /// Append one record.
    ///
    /// Returns `false` when a record with the same `url` and `timestamp`
    /// already exists; the store is left unchanged in that case.
    async fn add_record(&self, record: &CheckRecord) -> Result<bool, StorageError>;

    /// Up to `limit` most recent records, oldest first.
    async fn get_last(&self, limit: usize) -> Result<Vec<CheckRecord>, StorageError>;
}
