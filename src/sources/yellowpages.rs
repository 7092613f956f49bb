//! Yellow Pages business listings

use super::sectors::SectorTable;
use super::traits::*;
use crate::companies::CandidateRecord;
use crate::network::HttpClient;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| Selector::parse("div.result").unwrap());
static NAME: Lazy<Selector> = Lazy::new(|| Selector::parse("a.business-name").unwrap());
static CATEGORIES: Lazy<Selector> = Lazy::new(|| Selector::parse("div.categories").unwrap());
static ADDRESS: Lazy<Selector> = Lazy::new(|| Selector::parse("p.adr").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Category keywords specific to business listings
const LISTING_SECTORS: [(&str, &str); 10] = [
    ("tech", "Technology"),
    ("software", "Technology"),
    ("computer", "Technology"),
    ("restaurant", "Food & Beverage"),
    ("food", "Food & Beverage"),
    ("dining", "Food & Beverage"),
    ("doctor", "Healthcare"),
    ("insurance", "Finance"),
    ("bank", "Finance"),
    ("store", "Retail"),
];

/// Scrapes the Yellow Pages search result page
pub struct YellowPages {
    client: HttpClient,
    base_url: String,
    sectors: SectorTable,
    default_country: String,
    timeout: Option<Duration>,
}

impl YellowPages {
    /// Query used when the caller gives none
    pub const DEFAULT_QUERY: &'static str = "technology companies";

    pub fn new(client: HttpClient, sectors: SectorTable) -> Self {
        Self {
            client,
            base_url: "https://www.yellowpages.com".to_string(),
            sectors: sectors.with_leading(&LISTING_SECTORS),
            default_country: "United States".to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
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

    fn country_for(&self, location: &str) -> String {
        if location.to_uppercase().contains("CANADA") {
            "Canada".to_string()
        } else {
            self.default_country.clone()
        }
    }

    fn parse_listings(&self, html: &str, limit: usize) -> Vec<CandidateRecord> {
        let document = Html::parse_document(html);
        document
            .select(&LISTING)
            .filter_map(|listing| self.parse_listing(listing))
            .take(limit)
            .collect()
    }

    fn parse_listing(&self, listing: ElementRef<'_>) -> Option<CandidateRecord> {
        let name = text_of(listing, &NAME)?;
        let category = text_of(listing, &CATEGORIES).unwrap_or_else(|| "Business".to_string());
        let location = text_of(listing, &ADDRESS).unwrap_or_default();

        Some(
            CandidateRecord::new(name)
                .with_description(format!("Business listed in {} category", category))
                .with_country(self.country_for(&location))
                .with_sector(self.sectors.normalize(&category)),
        )
    }
}

fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>())
        .map(|t| WHITESPACE.replace_all(t.trim(), " ").into_owned())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl Source for YellowPages {
    fn name(&self) -> &str {
        "yellowpages"
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://www.yellowpages.com")
            .official_api(false)
            .results_format("HTML")
    }

    async fn fetch_records(
        &self,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, FetchError> {
        let query = query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(Self::DEFAULT_QUERY);
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get_html(&url, &[("search_terms", query.to_string())], self.timeout)
            .await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let records = self.parse_listings(&response.text, limit);
        debug!("Parsed {} listings from {}", records.len(), response.url);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="business-name">  Byte   Works </a>
            <div class="categories">Computer Repair</div>
            <p class="adr">12 Main St, Austin, TX</p>
          </div>
          <div class="result">
            <a class="business-name">Maple Diner</a>
            <div class="categories">Restaurants</div>
            <p class="adr">Toronto, ON, Canada</p>
          </div>
          <div class="result">
            <div class="categories">No name here</div>
          </div>
          <div class="result">
            <a class="business-name">Smith &amp; Sons</a>
          </div>
        </body></html>
    "#;

    fn source() -> YellowPages {
        let sectors = SectorTable::new(&Settings::default().sectors, "Services");
        YellowPages::new(HttpClient::new().unwrap(), sectors)
    }

    #[test]
    fn test_parse_listings() {
        let records = source().parse_listings(PAGE, 10);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name, "Byte Works");
        assert_eq!(records[0].economic_sector.as_deref(), Some("Technology"));
        assert_eq!(records[0].country_of_origin.as_deref(), Some("United States"));
        assert_eq!(
            records[0].description.as_deref(),
            Some("Business listed in Computer Repair category")
        );

        assert_eq!(records[1].economic_sector.as_deref(), Some("Food & Beverage"));
        assert_eq!(records[1].country_of_origin.as_deref(), Some("Canada"));

        assert_eq!(records[2].name, "Smith & Sons");
        assert_eq!(records[2].economic_sector.as_deref(), Some("Services"));
    }

    #[test]
    fn test_technology_keywords_win_over_food() {
        let source = source();
        assert_eq!(source.sectors.normalize("Food Technology"), "Technology");
        assert_eq!(source.sectors.normalize("Restaurant Software"), "Technology");
        assert_eq!(source.sectors.normalize("Fine Dining"), "Food & Beverage");
    }

    #[test]
    fn test_limit_applies_to_listings() {
        assert_eq!(source().parse_listings(PAGE, 1).len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_uses_default_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("search_terms", "technology companies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let records = source().with_base_url(server.uri()).fetch(None, 10).await;
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_blocked_request_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let records = source()
            .with_base_url(server.uri())
            .fetch(Some("plumbers"), 10)
            .await;
        assert!(records.is_empty());
    }
}
