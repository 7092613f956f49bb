//! Company persistence
//!
//! `CompanyStore` is the storage seam; `UpsertSink` is the only writer used by
//! ingestion runs.

mod memory;
mod sink;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sink::{SinkError, UpsertSink, Upserted};
pub use sqlite::SqliteStore;
pub use traits::*;

use crate::config::DatabaseSettings;
use std::sync::Arc;

/// Open the store selected by the database settings
pub async fn open(settings: &DatabaseSettings) -> Result<Arc<dyn CompanyStore>, StoreError> {
    if settings.is_memory() {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::connect(&settings.url, settings.max_connections).await?;
    Ok(Arc::new(store))
}
