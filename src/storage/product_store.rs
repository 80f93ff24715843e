//! ProductStore trait definition.

use async_trait::async_trait;

use crate::model::{NewProduct, Product};

use super::Result;

/// Interface for catalog product access.
///
/// Products are provisioned outside the storefront; the only mutation made
/// by the application itself is the score backfill (`update_score`).
///
/// # Implementations
///
/// - `SqliteProductStore`: SQLite storage
/// - `PostgresProductStore`: PostgreSQL storage
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ordered by id.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Fetch one product.
    ///
    /// Fails with `ProductNotFound` if the id is unknown.
    async fn get(&self, id: i64) -> Result<Product>;

    /// Check that `quantity` units of a product are available.
    ///
    /// Returns the product on success. Fails with `InvalidQuantity` for
    /// quantities below 1, `ProductNotFound`, or `InsufficientStock`.
    async fn ensure_stock(&self, id: i64, quantity: i64) -> Result<Product>;

    /// Products with no score yet, ordered by id.
    async fn list_unscored(&self) -> Result<Vec<Product>>;

    /// All products, highest score first, unscored last, ties by id.
    async fn list_by_score(&self) -> Result<Vec<Product>>;

    /// Set a product's sustainability score.
    ///
    /// Fails with `InvalidScore` when the score is not finite or outside
    /// 0–10, and with `ProductNotFound` if the id is unknown.
    async fn update_score(&self, id: i64, score: f64) -> Result<()>;

    /// Provision a product.
    ///
    /// Prices must be non-negative whole cents (`InvalidPrice`).
    async fn create(&self, product: NewProduct) -> Result<Product>;
}
