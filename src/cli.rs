//! Command line interface

use crate::config::Settings;
use crate::ingest::{IngestReport, Ingestor, RunOptions};
use crate::network::HttpClient;
use crate::sources::SourceLoader;
use crate::store::{self, UpsertSink};
use crate::web::{create_router, AppState};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "company-ingest", version, about = "Multi-source company data ingestion")]
pub struct Cli {
    /// Path to a settings.yml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the JSON API server (default if no subcommand given).
    Serve {
        /// Bind address, overrides server.bind_address
        #[arg(long)]
        host: Option<String>,
        /// Port, overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch company data from one source or all of them.
    Fetch {
        /// Source id, or `all`
        #[arg(long, default_value = "all")]
        source: String,
        /// Search query passed to the sources
        #[arg(long)]
        query: Option<String>,
        /// Maximum companies per source
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Show what would be fetched without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a batch of queries against a list of sources.
    Scheduled {
        #[arg(long, num_args = 1.., default_values = ["mock", "opencorporates"])]
        sources: Vec<String>,
        /// Queries to run, `ingestion.default_queries` when omitted
        #[arg(long, num_args = 1..)]
        queries: Vec<String>,
        #[arg(long, default_value_t = 5)]
        limit_per_query: usize,
        /// Seconds to pause between queries
        #[arg(long, default_value_t = 2.0)]
        pause: f64,
    },

    /// List available and unavailable sources.
    Sources,
}

/// Execute the parsed command against loaded settings
pub async fn run(command: Commands, settings: Settings) -> Result<()> {
    let settings = Arc::new(settings);
    let cancel = CancellationToken::new();
    spawn_ctrl_c(cancel.clone());

    match command {
        Commands::Serve { host, port } => serve(settings, host, port, cancel).await,
        Commands::Fetch {
            source,
            query,
            limit,
            dry_run,
        } => {
            let ingestor = build_ingestor(&settings).await?;
            let options = RunOptions::new().dry_run(dry_run).with_cancel(cancel);
            fetch(&ingestor, &source, query.as_deref(), limit, &options).await
        }
        Commands::Scheduled {
            sources,
            queries,
            limit_per_query,
            pause,
        } => {
            let ingestor = build_ingestor(&settings).await?;
            let options = RunOptions::new().with_cancel(cancel);
            let pause = Duration::try_from_secs_f64(pause).unwrap_or(Duration::ZERO);
            let queries = scheduled_queries(queries, &settings);
            scheduled(&ingestor, &sources, &queries, limit_per_query, pause, &options).await
        }
        Commands::Sources => {
            let client = HttpClient::with_settings(&settings.outgoing)?;
            list_sources(&SourceLoader::load(&settings, &client));
            Ok(())
        }
    }
}

/// Build the registry, store, sink and coordinator from settings
pub async fn build_ingestor(settings: &Settings) -> Result<Ingestor> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let registry = SourceLoader::load(settings, &client);
    let store = store::open(&settings.database).await?;
    let sink = Arc::new(UpsertSink::new(store));
    Ok(Ingestor::from_settings(settings, Arc::new(registry), sink))
}

fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping");
            cancel.cancel();
        }
    });
}

async fn serve(
    settings: Arc<Settings>,
    host: Option<String>,
    port: Option<u16>,
    cancel: CancellationToken,
) -> Result<()> {
    let ingestor = build_ingestor(&settings).await?;
    let addr = SocketAddr::new(
        host.as_deref()
            .unwrap_or(&settings.server.bind_address)
            .parse()?,
        port.unwrap_or(settings.server.port),
    );
    let app = create_router(AppState::new(settings, Arc::new(ingestor)));

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

async fn fetch(
    ingestor: &Ingestor,
    source: &str,
    query: Option<&str>,
    limit: usize,
    options: &RunOptions,
) -> Result<()> {
    if options.dry_run {
        println!("DRY RUN MODE - No data will be saved");
    }
    println!(
        "Fetching company data from {} (query: {}, limit: {})",
        source,
        query.unwrap_or("none"),
        limit
    );

    let report = if source == "all" {
        ingestor.run_all(query, limit, options).await?
    } else {
        ingestor.run_one(source, query, limit, options).await?
    };
    print_report(&report, options.dry_run);
    Ok(())
}

fn print_report(report: &IngestReport, dry_run: bool) {
    if report.is_empty() {
        println!("No companies were fetched. Check your configuration and try again.");
    } else {
        let verb = if dry_run { "Would save" } else { "Successfully fetched" };
        println!("{} {} companies:", verb, report.len());
        for record in &report.records {
            let summary = record.summary();
            println!("  - {} ({})", summary.name, summary.country_of_origin);
        }
    }

    for failure in &report.failures {
        println!("Source {} failed: {}", failure.source, failure.error);
    }
    if report.skipped > 0 {
        println!("{} records could not be saved", report.skipped);
    }
    if report.cancelled {
        println!("Run cancelled, results are partial");
    }
}

/// Queries given on the command line, or the configured defaults
fn scheduled_queries(given: Vec<String>, settings: &Settings) -> Vec<String> {
    if given.is_empty() {
        settings.ingestion.default_queries.clone()
    } else {
        given
    }
}

async fn scheduled(
    ingestor: &Ingestor,
    sources: &[String],
    queries: &[String],
    limit_per_query: usize,
    pause: Duration,
    options: &RunOptions,
) -> Result<()> {
    let mut total = 0;

    'sources: for source in sources {
        if !ingestor.registry().contains(source) {
            warn!("Source '{}' not available, skipping", source);
            continue;
        }

        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                let cancelled = tokio::select! {
                    _ = options.cancel.cancelled() => true,
                    _ = tokio::time::sleep(pause) => false,
                };
                if cancelled {
                    break 'sources;
                }
            }

            println!("Fetching from {} with query: '{}'", source, query);
            let report = ingestor
                .run_one(source, Some(query), limit_per_query, options)
                .await?;
            println!("  Fetched {} companies", report.persisted());
            total += report.persisted();

            if report.cancelled {
                break 'sources;
            }
        }
    }

    println!("Scheduled fetch completed. Total companies: {}", total);
    Ok(())
}

fn list_sources(registry: &crate::sources::SourceRegistry) {
    println!("Available sources:");
    for source in registry.available_sources() {
        println!(
            "  {} ({}) priority {}{}",
            source.name,
            source.source,
            source.priority,
            if source.canned { " [canned]" } else { "" }
        );
    }

    if !registry.unavailable().is_empty() {
        println!("Unavailable sources:");
        for source in registry.unavailable() {
            println!("  {} ({}): {}", source.name, source.source, source.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::ingest::RateLimiter;
    use crate::sources::linkedin::LinkedIn;
    use crate::sources::SourceRegistry;
    use crate::store::MemoryStore;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "company-ingest",
            "fetch",
            "--source",
            "linkedin",
            "--limit",
            "3",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Fetch {
                source,
                limit,
                dry_run,
                query,
            }) => {
                assert_eq!(source, "linkedin");
                assert_eq!(limit, 3);
                assert!(dry_run);
                assert!(query.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_scheduled_defaults() {
        let cli =
            Cli::try_parse_from(["company-ingest", "scheduled", "--config", "a.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.yml")));
        match cli.command {
            Some(Commands::Scheduled {
                sources,
                queries,
                limit_per_query,
                pause,
            }) => {
                assert_eq!(sources, vec!["mock", "opencorporates"]);
                assert!(queries.is_empty());
                assert_eq!(limit_per_query, 5);
                assert_eq!(pause, 2.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scheduled_queries_fall_back_to_settings() {
        let mut settings = Settings::default();
        settings.ingestion.default_queries = vec!["robotics".to_string()];

        assert_eq!(scheduled_queries(Vec::new(), &settings), vec!["robotics"]);

        let cli = Cli::try_parse_from([
            "company-ingest",
            "scheduled",
            "--queries",
            "fintech",
            "biotech",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Scheduled { queries, .. }) => {
                assert_eq!(scheduled_queries(queries, &settings), vec!["fintech", "biotech"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["company-ingest"]).unwrap();
        assert!(cli.command.is_none());
    }

    fn ingestor() -> Ingestor {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(LinkedIn::new()), SourceConfig::named("linkedin"));
        let sink = Arc::new(UpsertSink::new(Arc::new(MemoryStore::new())));
        Ingestor::new(Arc::new(registry), sink).with_rate_limiter(RateLimiter::disabled())
    }

    #[tokio::test]
    async fn test_fetch_unknown_source_fails() {
        let err = fetch(&ingestor(), "bloomberg", None, 5, &RunOptions::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("linkedin"));
    }

    #[tokio::test]
    async fn test_scheduled_skips_unknown_sources() {
        let ingestor = ingestor();
        scheduled(
            &ingestor,
            &["missing".to_string(), "linkedin".to_string()],
            &["tech".to_string(), "cloud".to_string()],
            2,
            Duration::ZERO,
            &RunOptions::new(),
        )
        .await
        .unwrap();
        assert_eq!(ingestor.sink().store().count().await.unwrap(), 2);
    }
}
