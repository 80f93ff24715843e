//! Mock scoring service for local development and tests.
//!
//! Serves `POST /predict` with canned scores so the storefront and the
//! backfill can run without the real model. Used in-process by tests and as
//! the `greenshelf-mock-scorer` binary.
//!
//! Configuration via environment variables:
//! - `SCORE_RESPONSES`: comma-separated `keyword=score` pairs, matched
//!   case-insensitively against the description. A score of `error` makes
//!   the service answer 500 for that keyword.
//!   Example: "bamboo=8.7,plastic=2.1,broken=error"
//! - `MOCK_DEFAULT_SCORE`: score for unmatched descriptions (default: 5.0)
//! - `MOCK_SCORE_FIELD`: response field name (default: sustainability_index)

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// Canned answer for a keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockAnswer {
    Score(f64),
    Error,
}

/// Mock configuration.
#[derive(Debug, Clone)]
pub struct MockScorer {
    /// `(lowercase keyword, answer)`, first match wins.
    pub responses: Vec<(String, MockAnswer)>,
    pub default_score: f64,
    pub field: String,
}

impl Default for MockScorer {
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            default_score: 5.0,
            field: "sustainability_index".to_string(),
        }
    }
}

impl MockScorer {
    /// Create from `SCORE_RESPONSES`, `MOCK_DEFAULT_SCORE` and `MOCK_SCORE_FIELD`.
    pub fn from_env() -> Self {
        let mut mock = Self::default();

        if let Ok(mappings) = std::env::var("SCORE_RESPONSES") {
            mock.responses = parse_responses(&mappings);
        }
        if let Some(score) = std::env::var("MOCK_DEFAULT_SCORE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            mock.default_score = score;
        }
        if let Ok(field) = std::env::var("MOCK_SCORE_FIELD") {
            mock.field = field;
        }

        mock
    }

    /// Add a canned score for descriptions containing `keyword`.
    pub fn with_score(mut self, keyword: &str, score: f64) -> Self {
        self.responses.push((keyword.to_lowercase(), MockAnswer::Score(score)));
        self
    }

    /// Fail requests whose description contains `keyword`.
    pub fn with_error(mut self, keyword: &str) -> Self {
        self.responses.push((keyword.to_lowercase(), MockAnswer::Error));
        self
    }

    /// Report scores under a different field name.
    pub fn with_field(mut self, field: &str) -> Self {
        self.field = field.to_string();
        self
    }

    fn answer(&self, description: &str) -> MockAnswer {
        let description = description.to_lowercase();
        self.responses
            .iter()
            .find(|(keyword, _)| description.contains(keyword.as_str()))
            .map(|(_, answer)| *answer)
            .unwrap_or(MockAnswer::Score(self.default_score))
    }
}

/// Parse `keyword=score` pairs, skipping malformed entries.
pub fn parse_responses(mappings: &str) -> Vec<(String, MockAnswer)> {
    let mut responses = Vec::new();

    for pair in mappings.split(',') {
        let Some((keyword, value)) = pair.split_once('=') else {
            continue;
        };
        let keyword = keyword.trim().to_lowercase();
        let value = value.trim();

        let answer = if value.eq_ignore_ascii_case("error") {
            MockAnswer::Error
        } else if let Ok(score) = value.parse() {
            MockAnswer::Score(score)
        } else {
            warn!(keyword = %keyword, value = %value, "ignoring malformed mock response");
            continue;
        };

        info!(keyword = %keyword, answer = ?answer, "configured mock response");
        responses.push((keyword, answer));
    }

    responses
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    description: String,
}

async fn predict(
    State(mock): State<Arc<MockScorer>>,
    Json(req): Json<PredictRequest>,
) -> (StatusCode, Json<Value>) {
    match mock.answer(&req.description) {
        MockAnswer::Score(score) => {
            info!(description = %req.description, score, "mock prediction");
            let mut body = Map::new();
            body.insert(mock.field.clone(), json!(score));
            (StatusCode::OK, Json(Value::Object(body)))
        }
        MockAnswer::Error => {
            warn!(description = %req.description, "mock prediction failing on request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "prediction failed"})),
            )
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the mock service router.
pub fn router(mock: MockScorer) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(Arc::new(mock))
}
