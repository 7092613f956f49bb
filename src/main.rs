//! company-ingest: multi-source company data ingestion
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use company_ingest::{
    cli::{self, Cli, Commands},
    config,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load configuration
    let settings = config::load(args.config.as_deref())?;

    // Initialize logging, RUST_LOG wins over the configured level
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        "Starting company-ingest v{} ({})",
        company_ingest::VERSION,
        settings.general.instance_name
    );

    let command = args.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    cli::run(command, settings).await
}
