//! Scoring service configuration.

use std::time::Duration;

use serde::Deserialize;

/// Description used by the connectivity probe.
pub const PROBE_DESCRIPTION: &str = "LED desk lamp with plastic body";

/// Connection settings for the external scoring service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base URL; predictions are POSTed to `<base_url>/predict`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Timeout for the connectivity probe, in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            probe_timeout_secs: 10,
        }
    }
}

impl ScoringConfig {
    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
