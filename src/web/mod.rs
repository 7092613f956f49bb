//! Web server module
//!
//! Provides the JSON API over stored companies and the ingestion trigger.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
