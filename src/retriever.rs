//! Retrieval sequencer: one file per cycle, with outcome hooks.
//!
//! A [`FileListRetriever`] walks the candidate list of one source and stops
//! at the first file that needs processing. The caller processes it and then
//! reports the outcome with exactly one of
//! [`report_success`](FileListRetriever::report_success),
//! [`report_failure`](FileListRetriever::report_failure) or
//! [`report_deferred`](FileListRetriever::report_deferred).
//!
//! ```text
//! NotStarted ──get_all_files──▶ Scanning ──eligible──▶ Found
//!                                  │
//!                                  └──end of list──▶ Exhausted
//! ```
//!
//! The candidate list is fetched once per retriever and never refreshed, and
//! the scan position persists between calls. Files that appear in the source
//! after the first fetch stay invisible until a new retriever is built.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Result, TrackerError};
use crate::evaluator::needs_processing;
use crate::models::{FileStatus, RetrievedFile};
use crate::recorder::record_outcome;
use crate::source::FileSource;
use crate::store::TrackingStore;

/// Where a retriever is in its pass over the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Candidate list not fetched yet.
    NotStarted,
    /// Mid-list, no file currently held.
    Scanning,
    /// The last cycle returned a file.
    Found,
    /// The last cycle reached the end of the list.
    Exhausted,
}

pub struct FileListRetriever<S: ?Sized, F> {
    store: Arc<S>,
    source: F,
    source_id: i64,
    file_list: Option<Vec<String>>,
    next_index: usize,
    state: ScanState,
    current_files: Vec<RetrievedFile>,
}

impl<S, F> FileListRetriever<S, F>
where
    S: TrackingStore + ?Sized,
    F: FileSource,
{
    /// Build a retriever, creating the store schema if needed.
    pub async fn new(store: Arc<S>, source: F, source_id: i64) -> Result<Self> {
        store.ensure_initialized().await?;
        Ok(Self {
            store,
            source,
            source_id,
            file_list: None,
            next_index: 0,
            state: ScanState::NotStarted,
            current_files: Vec::new(),
        })
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn source_id(&self) -> i64 {
        self.source_id
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Files returned by the last cycle and not yet reported.
    pub fn current_files(&self) -> &[RetrievedFile] {
        &self.current_files
    }

    /// Run one cycle: return the next file that needs processing, or `None`
    /// when the rest of the candidate list is up to date.
    pub async fn retrieve_next(&mut self) -> Result<Option<RetrievedFile>> {
        if !self.current_files.is_empty() {
            for file in &self.current_files {
                warn!(
                    source = self.source.name(),
                    filename = %file.filename,
                    "discarding unreported file; it stays eligible"
                );
            }
            self.current_files.clear();
        }

        let filename = match self.next_eligible().await? {
            Some(filename) => filename,
            None => return Ok(None),
        };

        let content = self
            .source
            .get_file_content(&filename)
            .await
            .map_err(|e| TrackerError::fetch("get_file_content", filename.as_str(), e))?;

        info!(
            source = self.source.name(),
            filename = %filename,
            bytes = content.len(),
            "retrieved file"
        );
        let file = RetrievedFile { filename, content };
        self.current_files.push(file.clone());
        self.state = ScanState::Found;
        Ok(Some(file))
    }

    /// Advance the scan to the next file that needs processing and return
    /// its name, without fetching content or touching the current file set.
    ///
    /// Shares the scan position with [`retrieve_next`](Self::retrieve_next):
    /// a name returned here is not returned again by this retriever.
    pub async fn next_eligible(&mut self) -> Result<Option<String>> {
        if self.file_list.is_none() {
            let files = self
                .source
                .get_all_files()
                .await
                .map_err(|e| TrackerError::fetch("get_all_files", self.source.name(), e))?;
            debug!(source = self.source.name(), count = files.len(), "fetched candidate list");
            self.file_list = Some(files);
        }
        self.state = ScanState::Scanning;

        let total = self.file_list.as_ref().map_or(0, Vec::len);
        while self.next_index < total {
            let filename = match self.file_list.as_ref() {
                Some(list) => list[self.next_index].clone(),
                None => break,
            };
            self.next_index += 1;

            if needs_processing(&*self.store, &self.source, self.source_id, &filename).await? {
                return Ok(Some(filename));
            }
        }

        self.state = ScanState::Exhausted;
        Ok(None)
    }

    /// The current file was processed. Records `complete`, then runs the
    /// source's cleanup hook.
    pub async fn report_success(&mut self) -> Result<()> {
        let files = self.take_current();
        record_outcome(&*self.store, self.source_id, &files, FileStatus::Complete).await?;
        for file in &files {
            if let Err(e) = self.source.cleanup_file(&file.filename).await {
                warn!(
                    source = self.source.name(),
                    filename = %file.filename,
                    error = %e,
                    "cleanup hook failed"
                );
            }
        }
        Ok(())
    }

    /// Processing failed. The file is retried only if its content changes.
    pub async fn report_failure(&mut self) -> Result<()> {
        let files = self.take_current();
        record_outcome(&*self.store, self.source_id, &files, FileStatus::Failed).await
    }

    /// The file was not processed this time; retry it on the next pass.
    pub async fn report_deferred(&mut self) -> Result<()> {
        let files = self.take_current();
        record_outcome(&*self.store, self.source_id, &files, FileStatus::Retry).await
    }

    fn take_current(&mut self) -> Vec<RetrievedFile> {
        if self.state == ScanState::Found {
            self.state = ScanState::Scanning;
        }
        std::mem::take(&mut self.current_files)
    }
}
