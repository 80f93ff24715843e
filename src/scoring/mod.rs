//! Prediction gateway to the external sustainability scoring service.
//!
//! The service takes a free-text product description and answers with a
//! JSON object carrying a numeric score. Its response shape has varied
//! between deployments, so the score is located by [`extract_score`]
//! rather than by a fixed schema.

use async_trait::async_trait;
use serde_json::Value;

mod client;
mod config;
pub mod mock;

pub use client::HttpScoringClient;
pub use config::{ScoringConfig, PROBE_DESCRIPTION};

/// Response fields checked for a score, in priority order.
pub const SCORE_FIELDS: [&str; 3] = ["sustainability_index", "sustainability_score", "score"];

/// Errors from the scoring gateway.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Description is required")]
    EmptyDescription,

    /// The service refused the connection (not running, wrong port).
    #[error("Scoring service unavailable: {0}")]
    Unavailable(String),

    #[error("Scoring request timed out")]
    Timeout,

    #[error("Scoring service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoringError {
    /// Whether the service could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ScoringError::Unavailable(_))
    }
}

/// Something that can score a product description.
///
/// # Implementations
///
/// - `HttpScoringClient`: the external HTTP service
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Score a description.
    ///
    /// `Ok(None)` means the service answered but no usable score could be
    /// read from the response.
    async fn predict(&self, description: &str) -> Result<Option<f64>, ScoringError>;
}

/// Locate the score in a scoring service response.
///
/// The first of [`SCORE_FIELDS`] present in the object wins, even when its
/// value turns out to be unusable. Without any of them, the first
/// numeric-typed value in document order is used. Numbers and numeric
/// strings are accepted; anything else, and non-finite values, yield `None`.
pub fn extract_score(response: &Value) -> Option<f64> {
    let object = response.as_object()?;

    let candidate = SCORE_FIELDS
        .iter()
        .find_map(|field| object.get(*field))
        .or_else(|| object.values().find(|value| value.is_number()))?;

    let score = match candidate {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    score.is_finite().then_some(score)
}
