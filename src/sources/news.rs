//! Companies mentioned in industry news

use super::traits::*;
use crate::companies::CandidateRecord;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::info;

static MENTIONS: Lazy<Vec<CandidateRecord>> = Lazy::new(|| {
    vec![
        CandidateRecord::new("RoboCorp Industries")
            .with_description("Robotics company mentioned in recent funding news")
            .with_country("Japan")
            .with_sector("Robotics"),
        CandidateRecord::new("CryptoSecure Ltd")
            .with_description("Blockchain security company featured in tech news")
            .with_country("Switzerland")
            .with_sector("Cybersecurity"),
    ]
});

/// Extracting mentions from articles needs NLP; this serves canned mentions.
pub struct IndustryNews {
    feeds: Vec<String>,
}

impl IndustryNews {
    pub fn new() -> Self {
        Self {
            feeds: vec![
                "https://techcrunch.com".to_string(),
                "https://www.bloomberg.com/technology".to_string(),
                "https://www.reuters.com/business/technology".to_string(),
            ],
        }
    }

    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }
}

impl Default for IndustryNews {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for IndustryNews {
    fn name(&self) -> &str {
        "industry_news"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://techcrunch.com")
            .canned()
            .results_format("HTML")
    }

    async fn fetch_records(
        &self,
        _query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        info!(
            "Using canned company mentions for {} news feeds",
            self.feeds.len()
        );
        Ok(take_canned(&MENTIONS, limit))
    }
}
