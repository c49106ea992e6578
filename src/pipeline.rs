//! Poll orchestration.
//!
//! Drives a [`FileListRetriever`] cycle by cycle: retrieve one file, hand it
//! to a [`FileProcessor`], report the outcome, repeat until the candidate
//! list is exhausted or the run limit is hit. Cycles never overlap.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::TrackerError;
use crate::models::{FileStatus, RetrievedFile};
use crate::processor::{DirectoryProcessor, FileProcessor, Outcome};
use crate::recorder::record_outcome;
use crate::retriever::FileListRetriever;
use crate::source::FileSource;
use crate::source_fs::FilesystemSource;
use crate::store::{SqliteTrackingStore, TrackingStore};

/// Counts from one poll run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollSummary {
    pub processed: u64,
    pub rejected: u64,
    pub failed: u64,
    pub deferred: u64,
    /// The candidate list was fully scanned during this run.
    pub exhausted: bool,
}

impl PollSummary {
    pub fn cycles(&self) -> u64 {
        self.processed + self.rejected + self.failed + self.deferred
    }
}

/// Run up to `limit` cycles against an existing retriever.
///
/// Processor errors are logged and recorded as failures; store and fetch
/// errors abort the run and are returned.
pub async fn poll_with<S, F, P>(
    retriever: &mut FileListRetriever<S, F>,
    processor: &P,
    limit: usize,
) -> Result<PollSummary, TrackerError>
where
    S: TrackingStore + ?Sized,
    F: FileSource,
    P: FileProcessor + ?Sized,
{
    let mut summary = PollSummary::default();

    for _ in 0..limit {
        let file = match retriever.retrieve_next().await? {
            Some(file) => file,
            None => {
                summary.exhausted = true;
                break;
            }
        };

        match processor.process(&file).await {
            Ok(Outcome::Processed) => {
                retriever.report_success().await?;
                summary.processed += 1;
            }
            Ok(Outcome::Rejected) => {
                retriever.report_failure().await?;
                summary.rejected += 1;
            }
            Ok(Outcome::Deferred) => {
                retriever.report_deferred().await?;
                summary.deferred += 1;
            }
            Err(e) => {
                warn!(filename = %file.filename, error = %e, "processing failed");
                retriever.report_failure().await?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// `nrt poll <source>`: poll a configured source into the delivery directory.
pub async fn run_poll(
    config: &Config,
    source_name: &str,
    limit: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let source_config = config.source(source_name)?;
    let source = FilesystemSource::new(source_name, source_config)?;
    let store = Arc::new(SqliteTrackingStore::open(config).await?);
    let limit = limit.unwrap_or(config.poll.max_files);

    source.startup().await?;
    let mut retriever =
        FileListRetriever::new(Arc::clone(&store), source, source_config.source_id).await?;

    if dry_run {
        // Names only: nothing is fetched or reported, so nothing is written
        let result = list_pending(&mut retriever, limit).await;
        store.close().await;
        let pending = finish_run(result, retriever.source()).await?;

        println!("poll {} (dry-run)", source_name);
        println!("  files to process: {}", pending.len());
        for filename in &pending {
            println!("    {}", filename);
        }
        return Ok(());
    }

    let processor = DirectoryProcessor::new(config.delivery.dir.clone());
    let result = poll_with(&mut retriever, &processor, limit).await;
    store.close().await;
    let summary = finish_run(result, retriever.source()).await?;

    info!(source = source_name, cycles = summary.cycles(), "poll finished");
    println!("poll {}", source_name);
    println!("  processed: {}", summary.processed);
    println!("  rejected: {}", summary.rejected);
    println!("  failed: {}", summary.failed);
    println!("  deferred: {}", summary.deferred);
    println!(
        "  remaining: {}",
        if summary.exhausted { "none" } else { "more" }
    );
    println!("ok");

    Ok(())
}

/// Shut the source down after a run. The run's own error wins over a
/// shutdown error, and shutdown is skipped when the run failed.
async fn finish_run<T, F>(result: Result<T, TrackerError>, source: &F) -> Result<T>
where
    F: FileSource + ?Sized,
{
    let value = result?;
    source.shutdown().await?;
    Ok(value)
}

/// Names of up to `limit` files the next poll would process.
pub async fn list_pending<S, F>(
    retriever: &mut FileListRetriever<S, F>,
    limit: usize,
) -> Result<Vec<String>, TrackerError>
where
    S: TrackingStore + ?Sized,
    F: FileSource,
{
    let mut pending = Vec::new();
    while pending.len() < limit {
        match retriever.next_eligible().await? {
            Some(filename) => pending.push(filename),
            None => break,
        }
    }
    Ok(pending)
}

/// `nrt retry <source> <filename>`: record `retry` for one file so the next
/// poll picks it up regardless of content.
pub async fn run_retry(config: &Config, source_name: &str, filename: &str) -> Result<()> {
    let source_config = config.source(source_name)?;
    let source = FilesystemSource::new(source_name, source_config)?;
    let store = SqliteTrackingStore::open(config).await?;

    let content = source
        .get_file_content(filename)
        .await
        .map_err(|e| TrackerError::fetch("get_file_content", filename, e))?;
    let file = RetrievedFile {
        filename: filename.to_string(),
        content,
    };
    record_outcome(&store, source_config.source_id, &[file], FileStatus::Retry).await?;
    store.close().await;

    println!("{} marked for retry in {}", filename, source_name);
    Ok(())
}
