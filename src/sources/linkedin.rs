//! LinkedIn company pages
//!
//! LinkedIn requires authenticated API access, so this source serves canned
//! company pages.

use super::traits::*;
use crate::companies::CandidateRecord;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::warn;

static COMPANIES: Lazy<Vec<CandidateRecord>> = Lazy::new(|| {
    vec![
        CandidateRecord::new("Microsoft Corporation")
            .with_description(
                "Technology company developing and supporting software, services, devices and solutions",
            )
            .with_country("United States")
            .with_sector("Technology"),
        CandidateRecord::new("Google LLC")
            .with_description(
                "Multinational technology company specializing in Internet-related services and products",
            )
            .with_country("United States")
            .with_sector("Technology"),
        CandidateRecord::new("Amazon.com Inc.")
            .with_description(
                "Multinational technology company focusing on e-commerce and cloud computing",
            )
            .with_country("United States")
            .with_sector("Technology"),
    ]
});

pub struct LinkedIn;

impl LinkedIn {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinkedIn {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for LinkedIn {
    fn name(&self) -> &str {
        "linkedin"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://www.linkedin.com")
            .canned()
            .results_format("HTML")
    }

    async fn fetch_records(
        &self,
        _query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        warn!("LinkedIn requires authenticated API access, using canned data");
        Ok(take_canned(&COMPANIES, limit))
    }
}
