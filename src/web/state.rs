//! Application state shared across handlers

use crate::config::Settings;
use crate::ingest::Ingestor;
use crate::sources::SourceRegistry;
use crate::store::{CompanyStore, UpsertSink};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Company store, read side of the API. Writes go through [`AppState::sink`]
    pub store: Arc<dyn CompanyStore>,
    /// Ingestion coordinator, owns the registry and the sink
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    /// Create new application state around an ingestion coordinator
    pub fn new(settings: Arc<Settings>, ingestor: Arc<Ingestor>) -> Self {
        let store = ingestor.sink().store().clone();
        Self {
            settings,
            store,
            ingestor,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.ingestor.registry()
    }

    /// Writer shared with ingestion runs
    pub fn sink(&self) -> &Arc<UpsertSink> {
        self.ingestor.sink()
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
