//! Source registry for managing available company sources

use super::traits::Source;
use crate::config::SourceConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

struct Entry {
    source: Arc<dyn Source>,
    config: SourceConfig,
}

/// A configured source that could not be loaded
#[derive(Debug, Clone, Serialize)]
pub struct UnavailableSource {
    pub name: String,
    pub source: String,
    pub reason: String,
}

/// Listing entry for a loaded source
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub source: String,
    pub priority: i32,
    pub website: Option<String>,
    pub canned: bool,
}

/// Registry of all loaded sources, keyed by source id
pub struct SourceRegistry {
    /// Sources in registration order
    entries: Vec<Entry>,
    /// Source id to entry index
    index: HashMap<String, usize>,
    /// Sources named in configuration that failed to load
    unavailable: Vec<UnavailableSource>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            unavailable: Vec::new(),
        }
    }

    /// Register a source under `config.name`.
    ///
    /// Returns `false` if the id is already taken.
    pub fn register(&mut self, source: Arc<dyn Source>, config: SourceConfig) -> bool {
        if self.index.contains_key(&config.name) {
            warn!("Source id {} registered twice, keeping the first", config.name);
            return false;
        }
        self.index.insert(config.name.clone(), self.entries.len());
        self.entries.push(Entry { source, config });
        true
    }

    /// Record a configured source that could not be loaded
    pub fn mark_unavailable(&mut self, config: &SourceConfig, reason: impl Into<String>) {
        self.unavailable.push(UnavailableSource {
            name: config.name.clone(),
            source: config.source.clone(),
            reason: reason.into(),
        });
    }

    /// Get a source by id
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Source>> {
        self.index.get(name).map(|&i| &self.entries[i].source)
    }

    /// Source ids, highest priority first, ties in registration order
    pub fn names_by_priority(&self) -> Vec<&str> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        // Stable sort keeps registration order among equal priorities
        entries.sort_by(|a, b| b.config.priority.cmp(&a.config.priority));
        entries.iter().map(|e| e.config.name.as_str()).collect()
    }

    /// Loaded sources with their metadata, in priority order
    pub fn available_sources(&self) -> Vec<SourceInfo> {
        self.names_by_priority()
            .into_iter()
            .filter_map(|name| {
                let entry = &self.entries[*self.index.get(name)?];
                let about = entry.source.about();
                Some(SourceInfo {
                    name: entry.config.name.clone(),
                    source: entry.source.name().to_string(),
                    priority: entry.config.priority,
                    website: about.website,
                    canned: about.canned,
                })
            })
            .collect()
    }

    /// Configured sources that failed to load
    pub fn unavailable(&self) -> &[UnavailableSource] {
        &self.unavailable
    }

    /// Check if a source exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get number of registered sources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::crunchbase::CrunchbaseWeb;
    use crate::sources::linkedin::LinkedIn;
    use crate::sources::news::IndustryNews;

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register(
            Arc::new(LinkedIn::new()),
            SourceConfig::named("linkedin").with_priority(2),
        );
        registry.register(
            Arc::new(CrunchbaseWeb::new()),
            SourceConfig::named("crunchbase_web").with_priority(5),
        );
        registry.register(
            Arc::new(IndustryNews::new()),
            SourceConfig::named("industry_news").with_priority(2),
        );
        registry
    }

    #[test]
    fn test_registry() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("linkedin"));
        assert!(registry.get("yellowpages").is_none());
        assert_eq!(registry.available_sources()[0].priority, 5);
    }

    #[test]
    fn test_priority_order_ties_by_registration() {
        assert_eq!(
            registry().names_by_priority(),
            vec!["crunchbase_web", "linkedin", "industry_news"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut registry = registry();
        assert!(!registry.register(Arc::new(LinkedIn::new()), SourceConfig::named("linkedin")));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_available_and_unavailable() {
        let mut registry = registry();
        registry.mark_unavailable(&SourceConfig::named("bloomberg"), "unknown source type");

        let available = registry.available_sources();
        assert_eq!(available[0].name, "crunchbase_web");
        assert!(available[0].canned);
        assert_eq!(registry.unavailable()[0].name, "bloomberg");
    }
}
