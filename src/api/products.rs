//! Catalog handlers.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use super::{ApiError, AppState};
use crate::model::ProductView;

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>, ApiError> {
    let products = state
        .products
        .list()
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch products"))?;

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

pub(super) async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductView>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::validation("Invalid product id"))?;

    let product = state
        .products
        .get(id)
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch product"))?;

    Ok(Json(product.into()))
}
