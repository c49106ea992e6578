//! Core data models used throughout the tracker.
//!
//! A [`FileRecord`] is one row of the tracking store; a [`RetrievedFile`] is
//! what a retrieval cycle hands to the processing side.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Processing outcome stored for a file.
///
/// Persisted as an integer: `1` complete, `0` retry, `-1` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Processed successfully.
    Complete,
    /// Not processed this time; reprocess unconditionally on the next cycle.
    Retry,
    /// Processing failed; only reprocessed if the content changes.
    Failed,
}

impl FileStatus {
    pub fn as_i64(self) -> i64 {
        match self {
            FileStatus::Complete => 1,
            FileStatus::Retry => 0,
            FileStatus::Failed => -1,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self, TrackerError> {
        match value {
            1 => Ok(FileStatus::Complete),
            0 => Ok(FileStatus::Retry),
            -1 => Ok(FileStatus::Failed),
            other => Err(TrackerError::InvalidStatus(other)),
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Complete => write!(f, "complete"),
            FileStatus::Retry => write!(f, "retry"),
            FileStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(FileStatus::Complete),
            "retry" => Ok(FileStatus::Retry),
            "failed" => Ok(FileStatus::Failed),
            other => Err(format!(
                "unknown status '{}': expected complete, retry, or failed",
                other
            )),
        }
    }
}

/// One tracked file, keyed by `(source_id, filename)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub source_id: i64,
    pub filename: String,
    /// Hex SHA-256 of the content at the last recorded attempt.
    pub fingerprint: String,
    pub status: FileStatus,
    /// Unix seconds of the last write.
    pub updated_at: i64,
}

/// A file selected by a retrieval cycle, with its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_integer_mapping() {
        assert_eq!(FileStatus::Complete.as_i64(), 1);
        assert_eq!(FileStatus::Retry.as_i64(), 0);
        assert_eq!(FileStatus::Failed.as_i64(), -1);
        for status in [FileStatus::Complete, FileStatus::Retry, FileStatus::Failed] {
            assert_eq!(FileStatus::from_i64(status.as_i64()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_invalid_integer() {
        let err = FileStatus::from_i64(7).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidStatus(7)));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("RETRY".parse::<FileStatus>().unwrap(), FileStatus::Retry);
        assert_eq!(FileStatus::Failed.to_string(), "failed");
        assert!("done".parse::<FileStatus>().is_err());
    }
}
