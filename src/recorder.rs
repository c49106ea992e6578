//! Outcome recording: the only write path into the tracking store.

use tracing::info;

use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::models::{FileStatus, RetrievedFile};
use crate::store::TrackingStore;

/// Record `status` for each file, fingerprinting its content and stamping
/// the current time. Creates the record on first write, updates it after.
pub async fn record_outcome<S>(
    store: &S,
    source_id: i64,
    files: &[RetrievedFile],
    status: FileStatus,
) -> Result<()>
where
    S: TrackingStore + ?Sized,
{
    let now = chrono::Utc::now().timestamp();
    for file in files {
        let hash = fingerprint(&file.content);
        store
            .upsert(source_id, &file.filename, &hash, status, now)
            .await?;
        info!(source_id, filename = %file.filename, %status, "recorded outcome");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTrackingStore;

    fn file(name: &str, content: &[u8]) -> RetrievedFile {
        RetrievedFile {
            filename: name.to_string(),
            content: content.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_records_fingerprint_and_status() {
        let store = InMemoryTrackingStore::new();
        let before = chrono::Utc::now().timestamp();
        record_outcome(&store, 5, &[file("a.csv", b"data")], FileStatus::Complete)
            .await
            .unwrap();

        let record = store.lookup(5, "a.csv").await.unwrap().unwrap();
        assert_eq!(record.fingerprint, fingerprint(b"data"));
        assert_eq!(record.status, FileStatus::Complete);
        assert!(record.updated_at >= before);
    }

    #[tokio::test]
    async fn test_second_call_overwrites() {
        let store = InMemoryTrackingStore::new();
        record_outcome(&store, 5, &[file("a.csv", b"v1")], FileStatus::Failed)
            .await
            .unwrap();
        record_outcome(&store, 5, &[file("a.csv", b"v2")], FileStatus::Retry)
            .await
            .unwrap();

        let all = store.list(Some(5)).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, FileStatus::Retry);
        assert_eq!(all[0].fingerprint, fingerprint(b"v2"));
    }

    #[tokio::test]
    async fn test_empty_set_writes_nothing() {
        let store = InMemoryTrackingStore::new();
        record_outcome(&store, 5, &[], FileStatus::Complete)
            .await
            .unwrap();
        assert!(store.list(None).await.unwrap().is_empty());
    }
}
