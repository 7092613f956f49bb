//! Crunchbase-style sources
//!
//! Both variants serve canned data: the API variant until an API client is
//! wired in, the web variant because the site blocks scraping.

use super::traits::*;
use crate::companies::CandidateRecord;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::{info, warn};

static ORGANIZATIONS: Lazy<Vec<CandidateRecord>> = Lazy::new(|| {
    vec![
        CandidateRecord::new("TechNova Solutions")
            .with_description("AI-powered software solutions for enterprise clients")
            .with_country("United States")
            .with_sector("Technology"),
        CandidateRecord::new("GreenEnergy Corp")
            .with_description("Renewable energy solutions and sustainable technology")
            .with_country("Germany")
            .with_sector("Energy"),
        CandidateRecord::new("HealthTech Innovations")
            .with_description("Digital health platforms and medical device manufacturing")
            .with_country("Canada")
            .with_sector("Healthcare"),
        CandidateRecord::new("FinanceFlow Ltd")
            .with_description("Fintech solutions for digital banking and payments")
            .with_country("United Kingdom")
            .with_sector("Finance"),
        CandidateRecord::new("EduLearn Platform")
            .with_description("Online learning management and educational technology")
            .with_country("Australia")
            .with_sector("Education"),
    ]
});

static STARTUPS: Lazy<Vec<CandidateRecord>> = Lazy::new(|| {
    vec![
        CandidateRecord::new("DataFlow Analytics")
            .with_description("AI-powered data analytics platform for enterprise decision making")
            .with_country("United States")
            .with_sector("Technology"),
        CandidateRecord::new("GreenTech Solutions")
            .with_description("Sustainable technology solutions for carbon footprint reduction")
            .with_country("Denmark")
            .with_sector("Clean Technology"),
        CandidateRecord::new("HealthStream AI")
            .with_description(
                "Machine learning platform for medical diagnosis and treatment optimization",
            )
            .with_country("Canada")
            .with_sector("Healthcare Technology"),
    ]
});

/// Crunchbase organizations search
pub struct CrunchbaseApi {
    api_key: Option<String>,
}

impl CrunchbaseApi {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Source for CrunchbaseApi {
    fn name(&self) -> &str {
        "crunchbase"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://www.crunchbase.com")
            .official_api(true)
            .canned()
            .results_format("JSON")
    }

    async fn fetch_records(
        &self,
        _query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        if !self.has_api_key() {
            warn!("Crunchbase API key not configured, using canned data");
        }
        Ok(take_canned(&ORGANIZATIONS, limit))
    }
}

/// Crunchbase public startup pages
pub struct CrunchbaseWeb;

impl CrunchbaseWeb {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CrunchbaseWeb {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for CrunchbaseWeb {
    fn name(&self) -> &str {
        "crunchbase_web"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://www.crunchbase.com")
            .canned()
            .results_format("HTML")
    }

    async fn fetch_records(
        &self,
        _query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        info!("Using canned Crunchbase startup data");
        Ok(take_canned(&STARTUPS, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_canned_data() {
        let source = CrunchbaseApi::new(None);
        assert!(!source.has_api_key());

        let records = source.fetch(Some("anything"), 10).await;
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].name, "TechNova Solutions");
        assert_eq!(source.fetch(None, 2).await.len(), 2);
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        assert!(!CrunchbaseApi::new(Some("  ".to_string())).has_api_key());
        assert!(CrunchbaseApi::new(Some("key".to_string())).has_api_key());
    }

    #[tokio::test]
    async fn test_web_canned_data() {
        let records = CrunchbaseWeb::new().fetch(None, 10).await;
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1].economic_sector.as_deref(),
            Some("Clean Technology")
        );
    }
}
