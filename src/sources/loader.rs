//! Source loader for building the registry from configuration

use super::registry::SourceRegistry;
use super::sectors::SectorTable;
use super::traits::Source;
use super::{crunchbase, linkedin, mock, news, opencorporates, yellowpages};
use crate::config::{Settings, SourceConfig};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Loader for initializing sources from configuration
pub struct SourceLoader;

impl SourceLoader {
    /// Load all enabled sources from settings.
    ///
    /// A source whose type is unknown or whose config is invalid is logged,
    /// left out, and reported by [`SourceRegistry::unavailable`].
    pub fn load(settings: &Settings, client: &HttpClient) -> SourceRegistry {
        let mut registry = SourceRegistry::new();

        for config in &settings.sources {
            if config.disabled {
                info!("Skipping disabled source: {}", config.name);
                continue;
            }

            match Self::create_source(config, settings, client) {
                Ok(source) => {
                    if registry.register(source, config.clone()) {
                        info!("Loaded source: {} ({})", config.name, config.source);
                    } else {
                        registry.mark_unavailable(config, "duplicate source id");
                    }
                }
                Err(e) => {
                    warn!("Failed to load source {}: {}", config.name, e);
                    registry.mark_unavailable(config, e.to_string());
                }
            }
        }

        info!("Loaded {} sources", registry.len());
        registry
    }

    /// Create a source instance from its config
    fn create_source(
        config: &SourceConfig,
        settings: &Settings,
        client: &HttpClient,
    ) -> Result<Arc<dyn Source>> {
        if let Some(ref base_url) = config.base_url {
            Url::parse(base_url)
                .map_err(|e| anyhow::anyhow!("Invalid base_url {}: {}", base_url, e))?;
        }
        let timeout = config
            .timeout
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| anyhow::anyhow!("Invalid timeout {}", secs))
            })
            .transpose()?;

        let source: Arc<dyn Source> = match config.source.as_str() {
            "mock" => {
                let mut source = mock::MockApi::new(client.clone()).with_timeout(timeout);
                if let Some(ref base_url) = config.base_url {
                    source = source.with_base_url(base_url);
                }
                Arc::new(source)
            }
            "crunchbase" => Arc::new(crunchbase::CrunchbaseApi::new(config.api_key.clone())),
            "crunchbase_web" => Arc::new(crunchbase::CrunchbaseWeb::new()),
            "opencorporates" => {
                let sectors = SectorTable::new(&settings.sectors, "Unknown");
                let mut source = opencorporates::OpenCorporates::new(client.clone(), sectors)
                    .with_api_token(config.api_key.clone())
                    .with_timeout(timeout);
                if let Some(ref base_url) = config.base_url {
                    source = source.with_base_url(base_url);
                }
                if let Some(ref country) = config.default_country {
                    source = source.with_default_country(country);
                }
                Arc::new(source)
            }
            "yellowpages" => {
                let sectors = SectorTable::new(&settings.sectors, "Services");
                let mut source =
                    yellowpages::YellowPages::new(client.clone(), sectors).with_timeout(timeout);
                if let Some(ref base_url) = config.base_url {
                    source = source.with_base_url(base_url);
                }
                if let Some(ref country) = config.default_country {
                    source = source.with_default_country(country);
                }
                Arc::new(source)
            }
            "linkedin" => Arc::new(linkedin::LinkedIn::new()),
            "industry_news" => Arc::new(news::IndustryNews::new()),
            other => {
                return Err(anyhow::anyhow!("Unknown source type: {}", other));
            }
        };

        Ok(source)
    }

    /// Get list of available source types
    pub fn available_types() -> Vec<&'static str> {
        vec![
            "mock",
            "crunchbase",
            "crunchbase_web",
            "opencorporates",
            "yellowpages",
            "linkedin",
            "industry_news",
        ]
    }
}
