//! # NRT Tracker CLI (`nrt`)
//!
//! ## Usage
//!
//! ```bash
//! nrt --config ./config/nrt.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nrt init` | Create the SQLite database and the `files` table |
//! | `nrt sources` | List configured sources and their health |
//! | `nrt poll <source>` | Deliver new, changed and deferred files |
//! | `nrt status` | List tracked files and their last outcome |
//! | `nrt retry <source> <file>` | Force a file to be reprocessed on the next poll |
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `nrt_tracker=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nrt_tracker::{config, migrate, pipeline, sources, status};

const DEFAULT_LOG_FILTER: &str = "nrt_tracker=info,nrt=info";

/// NRT Tracker CLI: poll sources and deliver each file once per content change.
#[derive(Parser)]
#[command(
    name = "nrt",
    about = "Poll file sources and deliver each file once per content change",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/nrt.toml")]
    config: PathBuf,

    /// Log debug output (evaluation decisions) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it on an existing database changes nothing.
    Init,

    /// List configured sources and whether their roots are reachable.
    Sources,

    /// Run retrieval cycles for one source.
    ///
    /// Each cycle delivers at most one file that is new, changed since its
    /// last recorded outcome, or marked for retry.
    Poll {
        /// Source name as configured under `[sources.<name>]`.
        source: String,

        /// Maximum number of files to process (defaults to `poll.max_files`).
        #[arg(long)]
        limit: Option<usize>,

        /// List the files that would be processed without recording anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show tracked files.
    Status {
        /// Only show records for this source.
        #[arg(long)]
        source: Option<String>,

        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mark a file for retry so the next poll processes it.
    Retry {
        /// Source name.
        source: String,
        /// Filename relative to the source root.
        filename: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("nrt_tracker=debug,nrt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Sources => {
            sources::list_sources(&cfg).await?;
        }
        Commands::Poll {
            source,
            limit,
            dry_run,
        } => {
            pipeline::run_poll(&cfg, &source, limit, dry_run).await?;
        }
        Commands::Status { source, json } => {
            status::run_status(&cfg, source.as_deref(), json).await?;
        }
        Commands::Retry { source, filename } => {
            pipeline::run_retry(&cfg, &source, &filename).await?;
        }
    }

    Ok(())
}
