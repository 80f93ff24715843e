//! REST error taxonomy and its mapping to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::scoring::ScoringError;
use crate::storage::StorageError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const CART_ITEM_NOT_FOUND: &str = "Cart item not found";
pub const INSUFFICIENT_STOCK: &str = "Insufficient stock";
pub const INSUFFICIENT_STOCK_TOTAL: &str = "Insufficient stock for requested quantity";
pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";
pub const QUANTITY_REQUIRED: &str = "Valid quantity is required";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const SCORER_UNAVAILABLE: &str = "ML service unavailable. Please ensure the scoring service is running.";
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Errors surfaced by REST handlers, serialized as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// Unknown id or route (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// Requested quantity exceeds stock (400).
    #[error("{0}")]
    InsufficientStock(&'static str),

    /// Scoring service unreachable (503).
    #[error("{}", SCORER_UNAVAILABLE)]
    ServiceUnavailable,

    /// Anything else (500). `context` is what the client sees; `detail` is
    /// only logged.
    #[error("{context}")]
    Unexpected { context: &'static str, detail: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unexpected(context: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Unexpected {
            context,
            detail: detail.to_string(),
        }
    }

    /// Map a storage failure, using `context` for unexpected ones.
    pub fn from_storage(err: StorageError, context: &'static str) -> Self {
        match err {
            StorageError::ProductNotFound(_) => ApiError::NotFound(PRODUCT_NOT_FOUND),
            StorageError::CartItemNotFound(_) => ApiError::NotFound(CART_ITEM_NOT_FOUND),
            StorageError::InsufficientStock { .. } => ApiError::InsufficientStock(INSUFFICIENT_STOCK),
            StorageError::InvalidQuantity(_) => ApiError::validation(QUANTITY_REQUIRED),
            StorageError::InvalidPrice(price) => ApiError::validation(format!("Invalid price: {price}")),
            StorageError::InvalidScore(score) => {
                ApiError::validation(format!("Invalid sustainability score: {score}"))
            }
            other => ApiError::unexpected(context, other),
        }
    }

    /// Map a scoring failure, using `context` for unexpected ones.
    pub fn from_scoring(err: ScoringError, context: &'static str) -> Self {
        match err {
            ScoringError::EmptyDescription => ApiError::validation(DESCRIPTION_REQUIRED),
            ScoringError::Unavailable(reason) => {
                warn!(reason = %reason, "scoring service unreachable");
                ApiError::ServiceUnavailable
            }
            other => ApiError::unexpected(context, other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unexpected { context, detail } = &self {
            error!(error = %detail, "{}", context);
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
