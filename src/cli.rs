//! Command-line surface: argument parsing and command execution.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::api::{start_server, ApiContext};
use crate::config;
use crate::db::DatabaseError;
use crate::pipeline::bloodwork;
use crate::pipeline::report::{
    parse_report_date, sanitize_report_text, InMemoryMarkerStore, MarkerStore, PlainTextSource,
    ProcessingError, ReportProcessor, ReportRequest, SqliteMarkerStore, TextSource,
};

#[derive(Parser, Debug)]
#[command(name = "labscan", version)]
#[command(about = "Extract blood test markers from lab report text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract markers from a text report and print the result as JSON
    Extract {
        /// Plain-text report file
        file: PathBuf,
    },

    /// Extract markers from a report and store them for a user
    Process {
        /// Plain-text report file
        file: PathBuf,

        /// User the record belongs to
        #[arg(short, long)]
        user: String,

        /// Report date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        report_date: Option<String>,

        /// Report identifier (defaults to a new UUID)
        #[arg(long)]
        report_id: Option<String>,

        /// Marker database path
        #[arg(long, env = "LABSCAN_DB")]
        db: Option<PathBuf>,

        /// Process without writing to the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Print stored marker records for a user, newest first
    History {
        #[arg(short, long)]
        user: String,

        /// Marker database path
        #[arg(long, env = "LABSCAN_DB")]
        db: Option<PathBuf>,
    },

    /// Run the HTTP API until interrupted
    Serve {
        /// Address to bind
        #[arg(long, env = "LABSCAN_ADDR", default_value = config::DEFAULT_BIND_ADDR)]
        addr: String,

        /// Marker database path
        #[arg(long, env = "LABSCAN_DB")]
        db: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid bind address {0}")]
    InvalidAddr(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Execute a parsed command. Results go to stdout as pretty JSON.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Extract { file } => {
            let bytes = read_file(&file)?;
            let text = PlainTextSource.acquire(&bytes, file.to_str())?;
            let result = bloodwork::extract(&sanitize_report_text(&text));
            print_json(&result)
        }

        Commands::Process {
            file,
            user,
            report_date,
            report_id,
            db,
            dry_run,
        } => {
            let bytes = read_file(&file)?;
            let store: Box<dyn MarkerStore + Send + Sync> = if dry_run {
                Box::new(InMemoryMarkerStore::new())
            } else {
                Box::new(SqliteMarkerStore::open(&database_path(db))?)
            };
            let processor = ReportProcessor::new(Box::new(PlainTextSource), store);

            let request = ReportRequest {
                user_id: user,
                report_date: report_date.as_deref().map(parse_report_date).transpose()?,
                report_id,
                file_name: file.file_name().map(|n| n.to_string_lossy().into_owned()),
                source: None,
            };
            let outcome = processor.process(&bytes, &request)?;
            print_json(&outcome.record)
        }

        Commands::History { user, db } => {
            let store = SqliteMarkerStore::open(&database_path(db))?;
            print_json(&store.list_for_user(&user)?)
        }

        Commands::Serve { addr, db } => {
            let addr: SocketAddr = addr
                .parse()
                .map_err(|_| CliError::InvalidAddr(addr.clone()))?;
            let store = SqliteMarkerStore::open(&database_path(db))?;
            let ctx = ApiContext::new(ReportProcessor::new(
                Box::new(PlainTextSource),
                Box::new(store),
            ));

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async move {
                let server = start_server(ctx, addr).await?;
                tracing::info!(addr = %server.addr, "Listening; press Ctrl-C to stop");
                tokio::signal::ctrl_c().await?;
                server.shutdown().await;
                Ok::<(), CliError>(())
            })
        }
    }
}

fn database_path(db: Option<PathBuf>) -> PathBuf {
    db.unwrap_or_else(config::default_database_path)
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
