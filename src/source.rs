//! Source collaborator interface.
//!
//! A [`FileSource`] knows how to list, fingerprint, and download the files of
//! one origin (an instrument, a feed, a drop directory). The tracking core
//! depends only on this trait; it never decides *how* files are fetched.
//!
//! # Lifecycle
//!
//! 1. [`check`](FileSource::check) validates configuration (`nrt sources`).
//! 2. [`startup`](FileSource::startup) runs before the first cycle.
//! 3. Cycles call [`get_all_files`](FileSource::get_all_files) once, then
//!    [`get_fingerprint`](FileSource::get_fingerprint) and
//!    [`get_file_content`](FileSource::get_file_content) per candidate.
//! 4. [`cleanup_file`](FileSource::cleanup_file) runs after a file is
//!    reported as processed.
//! 5. [`shutdown`](FileSource::shutdown) runs when polling stops.
//!
//! Errors are plain `anyhow` errors. The core wraps them in
//! [`TrackerError::Fetch`](crate::error::TrackerError::Fetch) without
//! retrying; retries happen only through the `retry` status on a later cycle.
//!
//! # Example
//!
//! ```rust
//! use anyhow::Result;
//! use async_trait::async_trait;
//! use nrt_tracker::source::FileSource;
//!
//! pub struct StaticSource;
//!
//! #[async_trait]
//! impl FileSource for StaticSource {
//!     fn name(&self) -> &str { "static" }
//!
//!     async fn get_all_files(&self) -> Result<Vec<String>> {
//!         Ok(vec!["one.csv".to_string()])
//!     }
//!
//!     async fn get_fingerprint(&self, _filename: &str) -> Result<String> {
//!         Ok(nrt_tracker::fingerprint::fingerprint(b"1,2,3"))
//!     }
//!
//!     async fn get_file_content(&self, _filename: &str) -> Result<Vec<u8>> {
//!         Ok(b"1,2,3".to_vec())
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FileSource: Send + Sync {
    /// Human-readable source name, used in logs and errors.
    fn name(&self) -> &str;

    /// Full candidate list, in the order files should be considered.
    async fn get_all_files(&self) -> Result<Vec<String>>;

    /// Fingerprint of a file's current content.
    ///
    /// Must agree with [`fingerprint`](crate::fingerprint::fingerprint) of
    /// the bytes [`get_file_content`](FileSource::get_file_content) would
    /// return, otherwise unchanged files look modified on every cycle.
    async fn get_fingerprint(&self, filename: &str) -> Result<String>;

    /// Full content of a file. Only called for files that need processing.
    async fn get_file_content(&self, filename: &str) -> Result<Vec<u8>>;

    /// Verify that the source is reachable and correctly configured.
    async fn check(&self) -> Result<()> {
        Ok(())
    }

    async fn startup(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Hook run after a file has been recorded as complete.
    async fn cleanup_file(&self, _filename: &str) -> Result<()> {
        Ok(())
    }
}
