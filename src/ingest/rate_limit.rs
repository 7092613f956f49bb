//! Per-source delay between ingestion steps

use crate::config::Settings;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Static per-source delays, no adaptive backoff
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delays: HashMap<String, Duration>,
    default_delay: Duration,
}

impl RateLimiter {
    pub fn new(default_delay: Duration) -> Self {
        Self {
            delays: HashMap::new(),
            default_delay,
        }
    }

    /// Limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Delays from the source configs, falling back to the ingestion default
    pub fn from_settings(settings: &Settings) -> Self {
        let mut limiter = Self::new(secs(settings.ingestion.default_rate_limit));
        for config in settings.enabled_sources() {
            let delay = secs(settings.rate_limit_for(&config.name));
            limiter = limiter.with_delay(&config.name, delay);
        }
        limiter
    }

    pub fn with_delay(mut self, source: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(source.into(), delay);
        self
    }

    /// Delay configured for a source
    pub fn delay_for(&self, source: &str) -> Duration {
        self.delays
            .get(source)
            .copied()
            .unwrap_or(self.default_delay)
    }

    /// Sleep for the source's delay.
    ///
    /// Returns `false` if the token was cancelled before the delay elapsed.
    pub async fn wait(&self, source: &str, cancel: &CancellationToken) -> bool {
        let delay = self.delay_for(source);
        if delay.is_zero() {
            return !cancel.is_cancelled();
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
