//! User agent rotation

use rand::seq::SliceRandom;

/// Used when no user agents are configured
const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Pool of user agent strings, one picked at random per request
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    pub fn new(agents: Vec<String>) -> Self {
        let agents = agents
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
        Self { agents }
    }

    /// Pick a user agent for the next request
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(|s| s.as_str())
            .unwrap_or(FALLBACK_USER_AGENT)
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}
