//! # NRT Tracker
//!
//! Polling file retrieval with durable processing state.
//!
//! A source (a drop directory, an instrument feed) exposes a list of files.
//! On every cycle the tracker walks that list, skips files whose content was
//! already processed, and hands out the first file that still needs work:
//! new files, files whose fingerprint changed, and files explicitly deferred
//! for retry. The outcome reported for that file is written back to SQLite so
//! the decision survives restarts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌───────────┐
//! │ FileSource  │──▶│  Retriever  │──▶│ Processor │
//! │ list/fetch  │   │ 1 per cycle │   │ (caller)  │
//! └─────────────┘   └──────┬──────┘   └─────┬─────┘
//!                          │ evaluate        │ outcome
//!                          ▼                 ▼
//!                     ┌──────────────────────────┐
//!                     │  TrackingStore (SQLite)  │
//!                     └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! nrt init                      # create database
//! nrt sources                   # check configured sources
//! nrt poll sensor_a             # deliver new/changed files
//! nrt status --source sensor_a  # inspect tracked files
//! nrt retry sensor_a run.csv    # force reprocessing
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Records, statuses, retrieved files |
//! | [`error`] | Error taxonomy |
//! | [`fingerprint`] | SHA-256 content fingerprints |
//! | [`store`] | Tracking store trait and backends |
//! | [`source`] | Source collaborator trait |
//! | [`source_fs`] | Filesystem source |
//! | [`evaluator`] | Needs-processing decision |
//! | [`retriever`] | One-file-per-cycle sequencer |
//! | [`recorder`] | Outcome write-back |
//! | [`processor`] | Processing collaborator trait |
//! | [`pipeline`] | Poll orchestration |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod config;
pub mod db;
pub mod error;
pub mod evaluator;
pub mod fingerprint;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod recorder;
pub mod retriever;
pub mod source;
pub mod source_fs;
pub mod sources;
pub mod status;
pub mod store;
