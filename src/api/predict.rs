//! Prediction proxy handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::error::DESCRIPTION_REQUIRED;
use super::types::{PredictRequest, PredictResponse};
use super::{ApiError, AppState};
use crate::sustainability::classify;

pub(super) async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    let description = match req.description {
        Some(description) if !description.trim().is_empty() => description,
        _ => return Err(ApiError::validation(DESCRIPTION_REQUIRED)),
    };

    let score = state
        .scorer
        .predict(&description)
        .await
        .map_err(|e| ApiError::from_scoring(e, "Failed to predict sustainability score"))?;

    let category = classify(score);
    info!(score = ?score, category = %category, "description scored");

    Ok(Json(PredictResponse {
        sustainability_score: score,
        category: category.into(),
    }))
}
