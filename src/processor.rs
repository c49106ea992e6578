//! Processing side of a poll: what happens to a retrieved file.
//!
//! The tracker never interprets file contents. A [`FileProcessor`] receives
//! each retrieved file and returns an [`Outcome`], which the poll loop maps
//! onto the retriever's report hooks.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::RetrievedFile;

/// Result of handing one file to a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Done; skip until the content changes.
    Processed,
    /// Permanently unusable in its current form.
    Rejected,
    /// Try again on the next pass regardless of content.
    Deferred,
}

#[async_trait]
pub trait FileProcessor: Send + Sync {
    /// Process one file. An `Err` is recorded as a failure.
    async fn process(&self, file: &RetrievedFile) -> Result<Outcome>;
}

/// Delivers files into an output directory, preserving relative paths.
/// Existing files are overwritten, so changed inputs replace stale copies.
pub struct DirectoryProcessor {
    dir: PathBuf,
}

impl DirectoryProcessor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileProcessor for DirectoryProcessor {
    async fn process(&self, file: &RetrievedFile) -> Result<Outcome> {
        if file.filename.split('/').any(|part| part == ".." || part.is_empty()) {
            return Ok(Outcome::Rejected);
        }

        let target = self.dir.join(&file.filename);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&target, &file.content)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        Ok(Outcome::Processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_nested_file() {
        let tmp = TempDir::new().unwrap();
        let processor = DirectoryProcessor::new(tmp.path().join("out"));
        let file = RetrievedFile {
            filename: "2024/07/run.csv".to_string(),
            content: b"a,b\n".to_vec(),
        };

        assert_eq!(processor.process(&file).await.unwrap(), Outcome::Processed);
        let written = std::fs::read(tmp.path().join("out/2024/07/run.csv")).unwrap();
        assert_eq!(written, b"a,b\n");
    }

    #[tokio::test]
    async fn test_rejects_escaping_names() {
        let tmp = TempDir::new().unwrap();
        let processor = DirectoryProcessor::new(tmp.path());
        let file = RetrievedFile {
            filename: "../escape.csv".to_string(),
            content: Vec::new(),
        };
        assert_eq!(processor.process(&file).await.unwrap(), Outcome::Rejected);
    }
}
