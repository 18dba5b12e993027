pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Binary entry point: initialize logging, parse arguments, run the command.
pub fn run() -> Result<(), cli::CliError> {
    // Logs go to stderr; stdout carries JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    cli::execute(cli::Cli::parse())
}
