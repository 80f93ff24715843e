//! Request and response bodies of the REST surface.
//!
//! Shared with [`crate::storefront::StorefrontClient`] so both sides agree
//! on the wire format.

use serde::{Deserialize, Serialize};

use crate::model::CartLine;
use crate::sustainability::CategoryFields;

/// `?session=` on cart routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}

/// `POST /api/cart`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Option<i64>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
    /// Defaults to the `default` session.
    pub user_session: Option<String>,
}

/// `PUT /api/cart/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: Option<i64>,
}

/// `POST /api/predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Confirmation of a cart write, with the stored line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartMutationResponse {
    pub message: String,
    pub item: CartLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub sustainability_score: Option<f64>,
    #[serde(flatten)]
    pub category: CategoryFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
