//! Ingestion run options and results

use crate::companies::{CandidateRecord, Company};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Errors rejected before any source runs
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unknown source '{name}', available sources: {}", .available.join(", "))]
    UnknownSource {
        name: String,
        available: Vec<String>,
    },

    #[error("limit must be a positive integer")]
    InvalidLimit,
}

/// Per-run switches
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fetch and report candidates without writing them
    pub dry_run: bool,
    /// Stops the run between sources and between records
    pub cancel: CancellationToken,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// One candidate that went through a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestedRecord {
    /// Written to the store
    Saved {
        source: String,
        company: Company,
        created: bool,
    },
    /// Fetched in a dry run, not written
    Preview {
        source: String,
        record: CandidateRecord,
    },
}

impl IngestedRecord {
    /// Source id that produced the record
    pub fn source(&self) -> &str {
        match self {
            Self::Saved { source, .. } | Self::Preview { source, .. } => source,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Saved { company, .. } => &company.name,
            Self::Preview { record, .. } => &record.name,
        }
    }

    /// Stored company, if the record was persisted
    pub fn company(&self) -> Option<&Company> {
        match self {
            Self::Saved { company, .. } => Some(company),
            Self::Preview { .. } => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// Flat view for listings and API responses
    pub fn summary(&self) -> IngestedSummary {
        match self {
            Self::Saved {
                source,
                company,
                created,
            } => IngestedSummary {
                id: Some(company.id),
                name: company.name.clone(),
                country_of_origin: company.country_of_origin.clone(),
                economic_sector: company.economic_sector.clone(),
                source: source.clone(),
                persisted: true,
                created: *created,
            },
            Self::Preview { source, record } => IngestedSummary {
                id: None,
                name: record.name.clone(),
                country_of_origin: record.country_of_origin.clone().unwrap_or_default(),
                economic_sector: record.economic_sector.clone().unwrap_or_default(),
                source: source.clone(),
                persisted: false,
                created: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedSummary {
    pub id: Option<i64>,
    pub name: String,
    pub country_of_origin: String,
    pub economic_sector: String,
    pub source: String,
    pub persisted: bool,
    pub created: bool,
}

/// A source that failed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Aggregate result of a run, records in processing order
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub records: Vec<IngestedRecord>,
    pub failures: Vec<SourceFailure>,
    /// Candidates the sink rejected
    pub skipped: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
}

impl IngestReport {
    pub(crate) fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Default::default()
        }
    }

    /// Persisted companies, in processing order
    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.records.iter().filter_map(IngestedRecord::company)
    }

    /// Number of companies written
    pub fn persisted(&self) -> usize {
        self.companies().count()
    }

    /// Number of companies written for the first time
    pub fn created(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, IngestedRecord::Saved { created: true, .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append another report, keeping its order after ours
    pub fn merge(&mut self, other: IngestReport) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
    }

    pub fn summaries(&self) -> Vec<IngestedSummary> {
        self.records.iter().map(IngestedRecord::summary).collect()
    }
}
