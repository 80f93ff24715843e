//! Cart handlers.
//!
//! Carts are scoped by an opaque session string. Requests that omit it act
//! on the `default` session.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::info;

use super::error::{INSUFFICIENT_STOCK, INSUFFICIENT_STOCK_TOTAL, PRODUCT_ID_REQUIRED, QUANTITY_REQUIRED};
use super::types::{AddToCartRequest, CartMutationResponse, MessageResponse, SessionQuery, UpdateCartRequest};
use super::{ApiError, AppState};
use crate::model::{CartItemView, DEFAULT_SESSION};
use crate::storage::StorageError;

fn session_of(query: Result<Query<SessionQuery>, QueryRejection>) -> Result<String, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;
    Ok(query.session.unwrap_or_else(|| DEFAULT_SESSION.to_string()))
}

fn line_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::validation("Invalid cart item id"))
}

pub(super) async fn list(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<Vec<CartItemView>>, ApiError> {
    let session = session_of(query)?;

    let items = state
        .carts
        .list(&session)
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch cart"))?;

    Ok(Json(items.into_iter().map(CartItemView::from).collect()))
}

pub(super) async fn add(
    State(state): State<AppState>,
    body: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<CartMutationResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    let product_id = req.product_id.ok_or_else(|| ApiError::validation(PRODUCT_ID_REQUIRED))?;
    let quantity = req.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(ApiError::validation(QUANTITY_REQUIRED));
    }
    let session = req.user_session.unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let outcome = state
        .carts
        .add(&session, product_id, quantity)
        .await
        .map_err(|e| match e {
            // The line already existed and the combined total is too large.
            StorageError::InsufficientStock { requested, .. } if requested > quantity => {
                ApiError::InsufficientStock(INSUFFICIENT_STOCK_TOTAL)
            }
            StorageError::InsufficientStock { .. } => ApiError::InsufficientStock(INSUFFICIENT_STOCK),
            other => ApiError::from_storage(other, "Failed to add item to cart"),
        })?;

    info!(
        session = %session,
        product_id,
        quantity = outcome.line.quantity,
        created = outcome.created,
        "cart line written"
    );

    let message = if outcome.created {
        "Item added to cart successfully"
    } else {
        "Cart updated successfully"
    };

    Ok(Json(CartMutationResponse {
        message: message.to_string(),
        item: outcome.line,
    }))
}

pub(super) async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateCartRequest>, JsonRejection>,
) -> Result<Json<CartMutationResponse>, ApiError> {
    let id = line_id(id)?;
    let Json(req) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    let quantity = match req.quantity {
        Some(quantity) if quantity >= 1 => quantity,
        _ => return Err(ApiError::validation(QUANTITY_REQUIRED)),
    };

    let line = state
        .carts
        .update_quantity(id, quantity)
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to update cart item"))?;

    Ok(Json(CartMutationResponse {
        message: "Cart item updated successfully".to_string(),
        item: line,
    }))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = line_id(id)?;

    state
        .carts
        .remove(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to remove cart item"))?;

    Ok(Json(MessageResponse {
        message: "Item removed from cart successfully".to_string(),
    }))
}

pub(super) async fn clear(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session = session_of(query)?;

    let removed = state
        .carts
        .clear(&session)
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to clear cart"))?;

    info!(session = %session, removed, "cart cleared");

    Ok(Json(MessageResponse {
        message: "Cart cleared successfully".to_string(),
    }))
}
