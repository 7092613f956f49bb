//! Ingestion execution and orchestration

use super::models::{IngestError, IngestReport, IngestedRecord, RunOptions, SourceFailure};
use super::rate_limit::RateLimiter;
use crate::config::Settings;
use crate::sources::{Source, SourceRegistry};
use crate::store::UpsertSink;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Ingestion coordinator that runs sources and feeds the upsert sink
pub struct Ingestor {
    /// Source registry
    registry: Arc<SourceRegistry>,
    /// Sink all persisted records go through
    sink: Arc<UpsertSink>,
    /// Delay between successive sources
    rate_limiter: RateLimiter,
    /// Upper bound on a per-source limit
    max_limit: usize,
    /// Sources fetched at once during a full run
    max_concurrent: usize,
}

impl Ingestor {
    /// Create a new coordinator with sequential runs and a one second delay
    pub fn new(registry: Arc<SourceRegistry>, sink: Arc<UpsertSink>) -> Self {
        Self {
            registry,
            sink,
            rate_limiter: RateLimiter::new(std::time::Duration::from_secs(1)),
            max_limit: 20,
            max_concurrent: 1,
        }
    }

    /// Create a coordinator with limits and delays taken from settings
    pub fn from_settings(
        settings: &Settings,
        registry: Arc<SourceRegistry>,
        sink: Arc<UpsertSink>,
    ) -> Self {
        Self::new(registry, sink)
            .with_rate_limiter(RateLimiter::from_settings(settings))
            .with_max_limit(settings.ingestion.max_companies_per_source)
            .with_max_concurrency(settings.ingestion.max_concurrent_sources)
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn registry(&self) -> &Arc<SourceRegistry> {
        &self.registry
    }

    pub fn sink(&self) -> &Arc<UpsertSink> {
        &self.sink
    }

    /// Source ids in the order a full run visits them
    pub fn available_sources(&self) -> Vec<String> {
        self.registry
            .names_by_priority()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Run a single source by id
    pub async fn run_one(
        &self,
        source: &str,
        query: Option<&str>,
        limit: usize,
        options: &RunOptions,
    ) -> Result<IngestReport, IngestError> {
        let limit = self.clamp_limit(limit)?;
        let instance = self
            .registry
            .get(source)
            .ok_or_else(|| IngestError::UnknownSource {
                name: source.to_string(),
                available: self.available_sources(),
            })?;

        let report = self
            .run_source(source, instance.clone(), query, limit, options)
            .await;
        info!(
            "Source {} processed {} companies",
            source,
            report.records.len()
        );
        Ok(report)
    }

    /// Run every registered source, highest priority first.
    ///
    /// A failing source is recorded in the report and the run moves on.
    pub async fn run_all(
        &self,
        query: Option<&str>,
        limit_per_source: usize,
        options: &RunOptions,
    ) -> Result<IngestReport, IngestError> {
        let limit = self.clamp_limit(limit_per_source)?;
        let names = self.available_sources();

        info!(
            "Starting ingestion across {} sources (dry run: {})",
            names.len(),
            options.dry_run
        );

        // Each source paired with the one before it, whose delay precedes it
        let previous = std::iter::once(None).chain(names.iter().cloned().map(Some));
        let steps: Vec<(String, Option<String>)> = names.iter().cloned().zip(previous).collect();

        let runs = steps.into_iter().map(move |(name, previous)| async move {
            if let Some(previous) = previous {
                if !self.rate_limiter.wait(&previous, &options.cancel).await {
                    return IngestReport::cancelled();
                }
            }
            match self.registry.get(&name) {
                Some(source) => {
                    self.run_source(&name, source.clone(), query, limit, options)
                        .await
                }
                None => IngestReport::default(),
            }
        });

        let reports: Vec<IngestReport> = stream::iter(runs)
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut report = IngestReport::default();
        for partial in reports {
            report.merge(partial);
        }

        info!(
            "Ingestion finished: {} records, {} failed sources, {} skipped",
            report.records.len(),
            report.failures.len(),
            report.skipped
        );
        Ok(report)
    }

    fn clamp_limit(&self, limit: usize) -> Result<usize, IngestError> {
        if limit == 0 {
            return Err(IngestError::InvalidLimit);
        }
        Ok(limit.min(self.max_limit))
    }

    /// Fetch one source and push its records through the sink
    async fn run_source(
        &self,
        name: &str,
        source: Arc<dyn Source>,
        query: Option<&str>,
        limit: usize,
        options: &RunOptions,
    ) -> IngestReport {
        if options.cancel.is_cancelled() {
            return IngestReport::cancelled();
        }

        info!("Fetching data from {}", name);
        let candidates = match AssertUnwindSafe(source.fetch(query, limit))
            .catch_unwind()
            .await
        {
            Ok(candidates) => candidates,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Error running source {}: {}", name, message);
                return IngestReport {
                    failures: vec![SourceFailure {
                        source: name.to_string(),
                        error: message,
                    }],
                    ..Default::default()
                };
            }
        };

        let mut report = IngestReport::default();
        for record in candidates {
            if options.cancel.is_cancelled() {
                warn!("Ingestion cancelled while processing {}", name);
                report.cancelled = true;
                break;
            }

            if options.dry_run {
                report.records.push(IngestedRecord::Preview {
                    source: name.to_string(),
                    record,
                });
                continue;
            }

            match self.sink.upsert(&record).await {
                Ok(upserted) => {
                    debug!(
                        "{} company {} from {}",
                        if upserted.created { "Created" } else { "Updated" },
                        upserted.company.name,
                        name
                    );
                    report.records.push(IngestedRecord::Saved {
                        source: name.to_string(),
                        company: upserted.company,
                        created: upserted.created,
                    });
                }
                Err(e) => {
                    error!("Error saving company {}: {}", record.name, e);
                    report.skipped += 1;
                }
            }
        }
        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "source panicked".to_string()
    }
}
