//! REST API for the storefront.
//!
//! Endpoints:
//! - `GET /api/test`: liveness probe
//! - `GET /api/products`, `GET /api/products/:id`: catalog with derived
//!   sustainability category fields
//! - `GET|POST|DELETE /api/cart`: list, add to, or clear a session's cart
//! - `PUT|DELETE /api/cart/:id`: change or remove one line
//! - `POST /api/predict`: score a free-text description
//!
//! Errors are JSON `{"error": message}` bodies; see [`ApiError`].

use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod cart;
mod error;
mod predict;
mod products;
pub mod types;


pub use error::ApiError;

use crate::scoring::ScoringService;
use crate::storage::{CartStore, ProductStore, Storage};
use types::MessageResponse;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub carts: Arc<dyn CartStore>,
    pub scorer: Arc<dyn ScoringService>,
}

impl AppState {
    pub fn new(storage: &Storage, scorer: Arc<dyn ScoringService>) -> Self {
        Self {
            products: storage.products.clone(),
            carts: storage.carts.clone(),
            scorer,
        }
    }
}

/// Bind the listening socket.
///
/// When `port` is 0, the OS assigns an ephemeral port; read it back from
/// the listener.
pub async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}

/// Serve the API until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "storefront REST API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("storefront REST API stopped");
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    // Unsupported methods on known paths get the JSON 404 too.
    Router::new()
        .route("/api/test", get(liveness).fallback(route_not_found))
        .route("/api/products", get(products::list).fallback(route_not_found))
        .route("/api/products/:id", get(products::get).fallback(route_not_found))
        .route(
            "/api/cart",
            get(cart::list)
                .post(cart::add)
                .delete(cart::clear)
                .fallback(route_not_found),
        )
        .route(
            "/api/cart/:id",
            put(cart::update).delete(cart::remove).fallback(route_not_found),
        )
        .route("/api/predict", post(predict::predict).fallback(route_not_found))
        .fallback(route_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Backend server is working!".to_string(),
    })
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound(error::ROUTE_NOT_FOUND)
}
