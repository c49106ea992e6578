//! In-memory [`TrackingStore`] implementation for tests and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock`. Nothing is persisted.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FileRecord, FileStatus};

use super::TrackingStore;

/// In-memory tracking store.
pub struct InMemoryTrackingStore {
    records: RwLock<HashMap<(i64, String), FileRecord>>,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTrackingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackingStore for InMemoryTrackingStore {
    async fn ensure_initialized(&self) -> Result<()> {
        Ok(())
    }

    async fn lookup(&self, source_id: i64, filename: &str) -> Result<Option<FileRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(&(source_id, filename.to_string())).cloned())
    }

    async fn upsert(
        &self,
        source_id: i64,
        filename: &str,
        fingerprint: &str,
        status: FileStatus,
        timestamp: i64,
    ) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(
            (source_id, filename.to_string()),
            FileRecord {
                source_id,
                filename: filename.to_string(),
                fingerprint: fingerprint.to_string(),
                status,
                updated_at: timestamp,
            },
        );
        Ok(())
    }

    async fn list(&self, source_id: Option<i64>) -> Result<Vec<FileRecord>> {
        let records = self.records.read().unwrap();
        let mut out: Vec<FileRecord> = records
            .values()
            .filter(|r| source_id.map_or(true, |id| r.source_id == id))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.source_id
                .cmp(&b.source_id)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        Ok(out)
    }
}
