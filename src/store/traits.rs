//! Store trait and errors

use crate::companies::{Company, CompanyFilter, NewCompany};
use async_trait::async_trait;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("company {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Backend(String),
}

/// Storage for companies
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// First company (lowest id) whose name matches case-insensitively
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError>;

    /// Get a company by id
    async fn get(&self, id: i64) -> Result<Option<Company>, StoreError>;

    /// Insert a company, assigning its id
    async fn insert(&self, company: NewCompany) -> Result<Company, StoreError>;

    /// Replace every field of an existing company
    async fn update(&self, company: &Company) -> Result<Company, StoreError>;

    /// Delete a company, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Companies passing the filter, in the filter's order
    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, StoreError>;

    /// Number of stored companies
    async fn count(&self) -> Result<usize, StoreError>;
}
