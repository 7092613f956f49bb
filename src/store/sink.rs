//! Case-insensitive upsert of candidate records

use super::traits::{CompanyStore, StoreError};
use crate::companies::{CandidateRecord, Company, NewCompany};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Failure persisting one candidate record
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub company: Company,
    /// Whether a new company was inserted
    pub created: bool,
}

/// Sole writer of companies, for ingestion runs and API edits alike.
///
/// Writes go through one lock, so two upserts for the same name cannot both
/// miss the lookup and insert twice, and an API edit cannot interleave with
/// the read-modify-write of an upsert.
pub struct UpsertSink {
    store: Arc<dyn CompanyStore>,
    write_lock: Mutex<()>,
}

impl UpsertSink {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn CompanyStore> {
        &self.store
    }

    /// Update the company matching `record.name` case-insensitively, or
    /// insert a new one. Empty incoming fields never overwrite stored ones.
    pub async fn upsert(&self, record: &CandidateRecord) -> Result<Upserted, SinkError> {
        if !record.has_name() {
            return Err(SinkError::InvalidRecord(
                "company name cannot be empty".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        let now = Utc::now();

        match self.store.find_by_name(&record.name).await? {
            Some(mut existing) => {
                existing.apply(record);
                existing.last_fetched_at = Some(now);
                let company = self.store.update(&existing).await?;
                debug!("Updated company: {}", company.name);
                Ok(Upserted {
                    company,
                    created: false,
                })
            }
            None => {
                let mut new = NewCompany::from_candidate(record);
                new.last_fetched_at = Some(now);
                let company = self.store.insert(new).await?;
                debug!("Created new company: {}", company.name);
                Ok(Upserted {
                    company,
                    created: true,
                })
            }
        }
    }

    /// Insert a company as given
    pub async fn create(&self, new: NewCompany) -> Result<Company, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store.insert(new).await
    }

    /// Replace the editable fields of company `id`, keeping its fetch time.
    ///
    /// Returns `None` if no such company exists.
    pub async fn replace(
        &self,
        id: i64,
        fields: NewCompany,
    ) -> Result<Option<Company>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(existing) = self.store.get(id).await? else {
            return Ok(None);
        };

        let company = Company {
            id,
            name: fields.name,
            description: fields.description,
            country_of_origin: fields.country_of_origin,
            economic_sector: fields.economic_sector,
            last_fetched_at: existing.last_fetched_at,
        };
        self.store.update(&company).await.map(Some)
    }

    /// Delete company `id`, returning whether it existed
    pub async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(id).await
    }
}
