//! Typed client for the storefront REST API, bound to one cart session.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{new_session_id, CartSummary};
use crate::api::types::{
    AddToCartRequest, CartMutationResponse, ErrorResponse, MessageResponse, PredictRequest, PredictResponse,
    SessionQuery, UpdateCartRequest,
};
use crate::model::{CartItemView, ProductView};

/// Errors from the storefront client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error body.
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
    session: String,
}

impl StorefrontClient {
    /// Client for `base_url` (e.g. `http://localhost:3000`) with a fresh session.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: new_session_id(),
        })
    }

    /// Use an existing session instead of the generated one.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_query(&self) -> SessionQuery {
        SessionQuery {
            session: Some(self.session.clone()),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        debug!(status = %status, message = %message, "storefront API error");
        Err(ClientError::Api { status, message })
    }

    /// `GET /api/test`.
    pub async fn ping(&self) -> Result<String> {
        let body: MessageResponse = self.send(self.client.get(self.url("/api/test"))).await?;
        Ok(body.message)
    }

    pub async fn products(&self) -> Result<Vec<ProductView>> {
        self.send(self.client.get(self.url("/api/products"))).await
    }

    pub async fn product(&self, id: i64) -> Result<ProductView> {
        self.send(self.client.get(self.url(&format!("/api/products/{id}"))))
            .await
    }

    /// This session's cart lines.
    pub async fn cart(&self) -> Result<Vec<CartItemView>> {
        let request = self.client.get(self.url("/api/cart")).query(&self.session_query());
        self.send(request).await
    }

    /// Totals for this session's cart.
    pub async fn cart_summary(&self) -> Result<CartSummary> {
        let items: Vec<_> = self.cart().await?.into_iter().map(|view| view.item).collect();
        Ok(CartSummary::from_items(&items))
    }

    pub async fn add_to_cart(&self, product_id: i64, quantity: i64) -> Result<CartMutationResponse> {
        let body = AddToCartRequest {
            product_id: Some(product_id),
            quantity: Some(quantity),
            user_session: Some(self.session.clone()),
        };
        self.send(self.client.post(self.url("/api/cart")).json(&body))
            .await
    }

    pub async fn update_cart_item(&self, id: i64, quantity: i64) -> Result<CartMutationResponse> {
        let body = UpdateCartRequest {
            quantity: Some(quantity),
        };
        self.send(self.client.put(self.url(&format!("/api/cart/{id}"))).json(&body))
            .await
    }

    pub async fn remove_cart_item(&self, id: i64) -> Result<MessageResponse> {
        self.send(self.client.delete(self.url(&format!("/api/cart/{id}"))))
            .await
    }

    pub async fn clear_cart(&self) -> Result<MessageResponse> {
        let request = self.client.delete(self.url("/api/cart")).query(&self.session_query());
        self.send(request).await
    }

    pub async fn predict(&self, description: &str) -> Result<PredictResponse> {
        let body = PredictRequest {
            description: Some(description.to_string()),
        };
        self.send(self.client.post(self.url("/api/predict")).json(&body))
            .await
    }
}
