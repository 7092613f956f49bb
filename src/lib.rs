//! company-ingest: multi-source company data ingestion
//!
//! Pulls candidate company records from pluggable sources, upserts them
//! into a store keyed by case-insensitive name, and serves the result over
//! a JSON API.

pub mod cli;
pub mod companies;
pub mod config;
pub mod ingest;
pub mod network;
pub mod sources;
pub mod store;
pub mod web;

pub use companies::{CandidateRecord, Company};
pub use config::Settings;
pub use ingest::{IngestReport, Ingestor, RunOptions};
pub use sources::{Source, SourceRegistry};
pub use store::{CompanyStore, UpsertSink};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
