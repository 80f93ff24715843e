//! HTTP client for the scoring service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{extract_score, ScoringConfig, ScoringError, ScoringService};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    description: &'a str,
}

/// Scoring service reached over HTTP.
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
}

impl HttpScoringClient {
    /// Create a client using the configured request timeout.
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        Self::with_timeout(config, config.timeout())
    }

    /// Create a client with an explicit timeout (the probe uses a shorter one).
    pub fn with_timeout(config: &ScoringConfig, timeout: Duration) -> Result<Self, ScoringError> {
        if config.base_url.trim().is_empty() {
            return Err(ScoringError::Config("scoring base URL not configured".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.predict_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify_error(&self, err: reqwest::Error) -> ScoringError {
        if err.is_connect() {
            ScoringError::Unavailable(format!("{}: {}", self.endpoint, err))
        } else if err.is_timeout() {
            ScoringError::Timeout
        } else {
            ScoringError::Http(err)
        }
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn predict(&self, description: &str) -> Result<Option<f64>, ScoringError> {
        if description.trim().is_empty() {
            return Err(ScoringError::EmptyDescription);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { description })
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, status = %status, "scoring service returned error status");
            return Err(ScoringError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: Value = response.json().await.map_err(|e| self.classify_error(e))?;
        debug!(endpoint = %self.endpoint, response = %body, "scoring service response");

        let score = extract_score(&body);
        if score.is_none() {
            warn!(response = %body, "no usable score in scoring response");
        }

        Ok(score)
    }
}
