//! Decides whether a candidate file needs (re)processing.
//!
//! | Stored record | Decision |
//! |---------------|----------|
//! | none | process (new file) |
//! | `retry` | process, fingerprint not consulted |
//! | `complete` / `failed` | process iff the fingerprint changed |

use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::FileStatus;
use crate::source::FileSource;
use crate::store::TrackingStore;

pub async fn needs_processing<S, F>(
    store: &S,
    source: &F,
    source_id: i64,
    filename: &str,
) -> Result<bool>
where
    S: TrackingStore + ?Sized,
    F: FileSource + ?Sized,
{
    let record = match store.lookup(source_id, filename).await? {
        None => {
            debug!(source_id, filename, "new file");
            return Ok(true);
        }
        Some(record) => record,
    };

    if record.status == FileStatus::Retry {
        debug!(source_id, filename, "marked for retry");
        return Ok(true);
    }

    let new_fingerprint = source
        .get_fingerprint(filename)
        .await
        .map_err(|e| TrackerError::fetch("get_fingerprint", filename, e))?;

    let changed = file_updated(store, source_id, filename, &new_fingerprint).await?;
    debug!(
        source_id,
        filename,
        status = %record.status,
        changed,
        "compared fingerprint"
    );
    Ok(changed)
}

/// Whether `new_fingerprint` differs from the stored one.
///
/// Fails with [`TrackerError::NotFound`] if the file has no record.
pub async fn file_updated<S>(
    store: &S,
    source_id: i64,
    filename: &str,
    new_fingerprint: &str,
) -> Result<bool>
where
    S: TrackingStore + ?Sized,
{
    let old = store.stored_fingerprint(source_id, filename).await?;
    Ok(old != new_fingerprint)
}
