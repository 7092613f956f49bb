//! Source traits and types

use crate::companies::CandidateRecord;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Failure reaching or reading an upstream source.
///
/// Never leaves the source: [`Source::fetch`] turns it into an empty result.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Source metadata
#[derive(Debug, Clone, Default)]
pub struct SourceAbout {
    /// Upstream website
    pub website: Option<String>,
    /// Whether it uses the official API
    pub use_official_api: bool,
    /// Whether the data is canned rather than fetched
    pub canned: bool,
    /// Upstream format (HTML, JSON)
    pub results: String,
}

impl SourceAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn canned(mut self) -> Self {
        self.canned = true;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}

/// An upstream that yields candidate company records
#[async_trait]
pub trait Source: Send + Sync {
    /// Source id
    fn name(&self) -> &str;

    /// Short description of the upstream
    fn about(&self) -> SourceAbout {
        SourceAbout::default()
    }

    /// Fetch up to `limit` candidates from the upstream
    async fn fetch_records(
        &self,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError>;

    /// Fetch candidates, recovering from upstream failures.
    ///
    /// The result never holds more than `limit` records.
    async fn fetch(&self, query: Option<&str>, limit: usize) -> Vec<CandidateRecord> {
        if limit == 0 {
            return Vec::new();
        }
        match self.fetch_records(query, limit).await {
            Ok(mut records) => {
                records.truncate(limit);
                debug!("Source {} produced {} records", self.name(), records.len());
                records
            }
            Err(e) => {
                warn!("Error fetching from {}: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Canned records cut to `limit`
pub(crate) fn take_canned(records: &[CandidateRecord], limit: usize) -> Vec<CandidateRecord> {
    records.iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky {
        fail: bool,
    }

    #[async_trait]
    impl Source for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_records(
            &self,
            _query: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<CandidateRecord>, FetchError> {
            if self.fail {
                return Err(FetchError::Status(503));
            }
            Ok((0..8)
                .map(|i| CandidateRecord::new(format!("Company {}", i)))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_truncates_to_limit() {
        let source = Flaky { fail: false };
        assert_eq!(source.fetch(None, 3).await.len(), 3);
        assert_eq!(source.fetch(None, 50).await.len(), 8);
        assert!(source.fetch(None, 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_recovers_from_errors() {
        let source = Flaky { fail: true };
        assert!(source.fetch(Some("anything"), 5).await.is_empty());
    }
}
