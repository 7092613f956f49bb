//! HTTP networking module
//!
//! Provides the HTTP client shared by sources that reach a real upstream.

mod client;
mod user_agent;

pub use client::{HttpClient, HttpResponse};
pub use user_agent::UserAgentPool;
