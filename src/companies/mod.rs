//! Company records and their projections
//!
//! This module defines the canonical company entity, the candidate records
//! produced by sources, and the filters used to query stored companies.

mod filter;
mod types;

pub use filter::{CompanyFilter, Ordering, OrderingField};
pub use types::*;
