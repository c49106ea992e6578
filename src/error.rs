//! Error types for the tracking core.

use thiserror::Error;

/// Result type used by the tracking core.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors raised while evaluating, retrieving, or recording files.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A record that must exist for a fingerprint comparison is missing.
    #[error("No tracking record for '{filename}' (source {source_id})")]
    NotFound { source_id: i64, filename: String },

    /// The tracking database could not be opened, read, or written.
    #[error("Tracking store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// A source collaborator call failed. Passed through uninterpreted.
    #[error("{operation} failed for '{target}': {source}")]
    Fetch {
        operation: &'static str,
        target: String,
        #[source]
        source: anyhow::Error,
    },

    /// A persisted status value outside the known set.
    #[error("Invalid file status value: {0}")]
    InvalidStatus(i64),

    /// IO error (database directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Create a not found error.
    pub fn not_found(source_id: i64, filename: impl Into<String>) -> Self {
        Self::NotFound {
            source_id,
            filename: filename.into(),
        }
    }

    /// Wrap a collaborator failure. `target` is the filename, or the
    /// source name for list operations.
    pub fn fetch(operation: &'static str, target: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            operation,
            target: target.into(),
            source,
        }
    }

    /// True for the not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
