//! OpenCorporates companies search

use super::sectors::{country_from_jurisdiction, SectorTable};
use super::traits::*;
use crate::companies::CandidateRecord;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Upstream page size cap
const MAX_PER_PAGE: usize = 30;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    #[serde(default)]
    companies: Vec<CompanyWrapper>,
}

#[derive(Debug, Deserialize)]
struct CompanyWrapper {
    company: OcCompany,
}

#[derive(Debug, Deserialize)]
struct OcCompany {
    name: Option<String>,
    jurisdiction_code: Option<String>,
    company_type: Option<String>,
}

/// OpenCorporates JSON API (works without a token on the free tier)
pub struct OpenCorporates {
    client: HttpClient,
    base_url: String,
    api_token: Option<String>,
    sectors: SectorTable,
    default_country: String,
    timeout: Option<Duration>,
}

impl OpenCorporates {
    pub fn new(client: HttpClient, sectors: SectorTable) -> Self {
        Self {
            client,
            base_url: "https://api.opencorporates.com/v0.4".to_string(),
            api_token: None,
            sectors,
            default_country: "Unknown".to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn to_record(&self, company: OcCompany) -> CandidateRecord {
        let jurisdiction = company.jurisdiction_code.unwrap_or_default();
        let country = country_from_jurisdiction(&jurisdiction)
            .map(str::to_string)
            .unwrap_or_else(|| self.default_country.clone());
        let sector = company
            .company_type
            .map(|t| self.sectors.normalize(&t))
            .unwrap_or_else(|| self.sectors.default_sector().to_string());
        let jurisdiction = if jurisdiction.is_empty() {
            "Unknown".to_string()
        } else {
            jurisdiction
        };

        CandidateRecord::new(
            company
                .name
                .unwrap_or_else(|| "Unknown Company".to_string()),
        )
        .with_description(format!("Company from {}", jurisdiction))
        .with_country(country)
        .with_sector(sector)
    }
}

#[async_trait]
impl Source for OpenCorporates {
    fn name(&self) -> &str {
        "opencorporates"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://opencorporates.com")
            .official_api(true)
            .results_format("JSON")
    }

    async fn fetch_records(
        &self,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        let mut params = vec![
            ("q", query.unwrap_or("company").to_string()),
            ("per_page", limit.min(MAX_PER_PAGE).to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(ref token) = self.api_token {
            params.push(("api_token", token.clone()));
        }

        let url = format!("{}/companies/search", self.base_url.trim_end_matches('/'));
        let response = self.client.get_json(&url, &params, self.timeout).await?;
        if response.status != 200 {
            return Err(FetchError::Status(response.status));
        }

        let body: SearchResponse = response.json()?;
        Ok(body
            .results
            .companies
            .into_iter()
            .map(|w| self.to_record(w.company))
            .collect())
    }
}
