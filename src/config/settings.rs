//! Settings structures for company-ingest configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub outgoing: OutgoingSettings,
    pub ingestion: IngestionSettings,
    pub sources: Vec<SourceConfig>,
    /// Ordered keyword to sector table, first match wins
    pub sectors: Vec<SectorRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            outgoing: OutgoingSettings::default(),
            ingestion: IngestionSettings::default(),
            sources: default_sources(),
            sectors: default_sectors(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (COMPANY_INGEST_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("COMPANY_INGEST_DEBUG") {
            self.general.debug = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("COMPANY_INGEST_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("COMPANY_INGEST_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("COMPANY_INGEST_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("COMPANY_INGEST_CRUNCHBASE_API_KEY") {
            self.set_api_key("crunchbase", val);
        }
        if let Ok(val) = std::env::var("COMPANY_INGEST_OPENCORPORATES_API_TOKEN") {
            self.set_api_key("opencorporates", val);
        }
    }

    fn set_api_key(&mut self, source: &str, key: String) {
        for config in self.sources.iter_mut().filter(|s| s.source == source) {
            config.api_key = Some(key.clone());
        }
    }

    /// Get source config by name
    pub fn get_source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Get all enabled sources
    pub fn enabled_sources(&self) -> Vec<&SourceConfig> {
        self.sources.iter().filter(|s| !s.disabled).collect()
    }

    /// Delay between requests to a source, in seconds
    pub fn rate_limit_for(&self, name: &str) -> f64 {
        self.get_source(name)
            .and_then(|s| s.rate_limit)
            .unwrap_or(self.ingestion.default_rate_limit)
    }
}

/// Truthy environment values: `true`, `1`, `yes`, `on`, any case
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "company-ingest".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL, or `memory` for the in-process store
    pub url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn is_memory(&self) -> bool {
        self.url == "memory"
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://companies.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// User agents to rotate through (empty = generated)
    pub user_agents: Vec<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            ],
            verify_ssl: true,
        }
    }
}

/// Ingestion run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Delay between sources when a source sets none (seconds)
    pub default_rate_limit: f64,
    /// Upper bound on records requested from one source per run
    pub max_companies_per_source: usize,
    /// Sources fetched at the same time (1 = sequential)
    pub max_concurrent_sources: usize,
    /// Limit used when the caller does not give one
    pub default_limit: usize,
    /// Retry attempts for upstream requests (not applied by the pipeline)
    pub retry_attempts: u32,
    /// Delay between retries in seconds (not applied by the pipeline)
    pub retry_delay: u64,
    /// Queries used by scheduled runs when none are given
    pub default_queries: Vec<String>,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            default_rate_limit: 1.0,
            max_companies_per_source: 20,
            max_concurrent_sources: 1,
            default_limit: 10,
            retry_attempts: 3,
            retry_delay: 5,
            default_queries: [
                "technology companies",
                "software companies",
                "fintech startups",
                "healthcare companies",
                "renewable energy companies",
                "artificial intelligence companies",
                "e-commerce companies",
                "biotechnology companies",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Individual source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source id (unique identifier)
    pub name: String,
    /// Adapter implementation to use
    pub source: String,
    /// Whether the source is disabled
    pub disabled: bool,
    /// Run priority, higher runs first
    pub priority: i32,
    /// Delay after this source before the next one (seconds)
    pub rate_limit: Option<f64>,
    /// API key or token if the upstream takes one
    pub api_key: Option<String>,
    /// Override for the upstream base URL
    pub base_url: Option<String>,
    /// Country used when the upstream does not supply one
    pub default_country: Option<String>,
    /// Custom request timeout for this source
    pub timeout: Option<f64>,
}

impl SourceConfig {
    /// Config for a source whose id is also its adapter name
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            name,
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_rate_limit(mut self, seconds: f64) -> Self {
        self.rate_limit = Some(seconds);
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            source: String::new(),
            disabled: false,
            priority: 0,
            rate_limit: None,
            api_key: None,
            base_url: None,
            default_country: None,
            timeout: None,
        }
    }
}

/// One entry of the sector mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorRule {
    /// Lowercase keyword looked up as a substring
    pub keyword: String,
    /// Canonical sector name
    pub sector: String,
}

impl SectorRule {
    pub fn new(keyword: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            sector: sector.into(),
        }
    }
}

/// Default source configurations
fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::named("mock").with_priority(1),
        SourceConfig::named("crunchbase")
            .with_priority(9)
            .with_rate_limit(2.0),
        SourceConfig::named("opencorporates")
            .with_priority(8)
            .with_rate_limit(1.5),
        SourceConfig::named("yellowpages")
            .with_priority(6)
            .with_rate_limit(2.0),
        SourceConfig::named("linkedin")
            .with_priority(7)
            .with_rate_limit(3.0),
        SourceConfig::named("crunchbase_web").with_priority(5),
        SourceConfig {
            disabled: true,
            ..SourceConfig::named("industry_news")
        },
    ]
}

/// Default sector table. Specific keywords come before the ones they contain.
fn default_sectors() -> Vec<SectorRule> {
    [
        ("fintech", "Finance"),
        ("biotech", "Healthcare"),
        ("artificial intelligence", "Technology"),
        ("real estate", "Real Estate"),
        ("e-commerce", "Retail"),
        ("ecommerce", "Retail"),
        ("retail", "Retail"),
        ("technology", "Technology"),
        ("software", "Technology"),
        ("tech", "Technology"),
        ("finance", "Finance"),
        ("banking", "Finance"),
        ("healthcare", "Healthcare"),
        ("health", "Healthcare"),
        ("medical", "Healthcare"),
        ("renewable", "Energy"),
        ("energy", "Energy"),
        ("education", "Education"),
        ("manufacturing", "Manufacturing"),
        ("automotive", "Manufacturing"),
        ("transportation", "Transportation"),
        ("logistics", "Transportation"),
        ("ai", "Technology"),
    ]
    .into_iter()
    .map(|(keyword, sector)| SectorRule::new(keyword, sector))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert!(!settings.general.debug);
        assert_eq!(settings.ingestion.max_companies_per_source, 20);
        assert_eq!(settings.sources.len(), 7);
    }

    #[test]
    fn test_parse_flag() {
        for truthy in ["true", "TRUE", "1", "yes", " On "] {
            assert!(parse_flag(truthy), "{truthy}");
        }
        for falsy in ["false", "0", "no", "", "enabled"] {
            assert!(!parse_flag(falsy), "{falsy}");
        }
    }

    #[test]
    fn test_source_lookup() {
        let settings = Settings::default();
        let linkedin = settings.get_source("linkedin").unwrap();
        assert_eq!(linkedin.priority, 7);
        assert_eq!(settings.rate_limit_for("linkedin"), 3.0);
        assert_eq!(settings.rate_limit_for("mock"), 1.0);
        assert_eq!(settings.rate_limit_for("missing"), 1.0);
    }

    #[test]
    fn test_industry_news_disabled_by_default() {
        let settings = Settings::default();
        let enabled: Vec<_> = settings
            .enabled_sources()
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert!(!enabled.contains(&"industry_news"));
        assert_eq!(enabled.len(), 6);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
server:
  port: 9090
database:
  url: memory
sources:
  - name: canned
    source: linkedin
    priority: 3
    rate_limit: 0.5
sectors:
  - keyword: robot
    sector: Robotics
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert!(settings.database.is_memory());
        assert_eq!(settings.sources.len(), 1);
        assert_eq!(settings.sources[0].source, "linkedin");
        assert_eq!(settings.rate_limit_for("canned"), 0.5);
        assert_eq!(settings.sectors, vec![SectorRule::new("robot", "Robotics")]);
    }
}
