//! Ingestion orchestration module
//!
//! Runs sources against a query, forwards their candidates to the upsert
//! sink, and aggregates what was persisted.

mod coordinator;
mod models;
mod rate_limit;

pub use coordinator::Ingestor;
pub use models::*;
pub use rate_limit::RateLimiter;
