//! Storage abstraction for the tracking records.
//!
//! The [`TrackingStore`] trait is the durable record of which files have
//! been seen, their last fingerprint, and their last outcome. Two backends
//! ship with the crate:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`SqliteTrackingStore`] | Durable store shared across runs and sources |
//! | [`InMemoryTrackingStore`] | Tests and embedding without a database |
//!
//! Every method is a single, independently committed operation. No call
//! holds a connection or transaction beyond its own statement, so retrievers
//! for different sources can interleave against the same store.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::{Result, TrackerError};
use crate::models::{FileRecord, FileStatus};

pub use memory::InMemoryTrackingStore;
pub use sqlite::SqliteTrackingStore;

/// Durable `(source_id, filename)` → record mapping.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Create the underlying schema if it is missing. Idempotent.
    async fn ensure_initialized(&self) -> Result<()>;

    /// Fetch the record for a file, or `None` if the file is unknown.
    async fn lookup(&self, source_id: i64, filename: &str) -> Result<Option<FileRecord>>;

    /// Insert a record, or replace fingerprint, status and timestamp of the
    /// existing one. Atomic per call.
    async fn upsert(
        &self,
        source_id: i64,
        filename: &str,
        fingerprint: &str,
        status: FileStatus,
        timestamp: i64,
    ) -> Result<()>;

    /// All records, optionally restricted to one source, ordered by
    /// `(source_id, filename)`.
    async fn list(&self, source_id: Option<i64>) -> Result<Vec<FileRecord>>;

    /// Stored fingerprint for a file the caller knows to be tracked.
    ///
    /// Absence here is a desync between caller and store, reported as
    /// [`TrackerError::NotFound`] rather than treated as a new file.
    async fn stored_fingerprint(&self, source_id: i64, filename: &str) -> Result<String> {
        self.lookup(source_id, filename)
            .await?
            .map(|record| record.fingerprint)
            .ok_or_else(|| TrackerError::not_found(source_id, filename))
    }
}
