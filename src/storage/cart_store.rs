//! CartStore trait definition.

use async_trait::async_trait;

use crate::model::{AddOutcome, CartItem, CartLine};

use super::Result;

/// Interface for per-session cart lines.
///
/// # Invariants
///
/// - At most one line per `(product, session)`; adding an already-carted
///   product increments the existing line.
/// - A line's quantity never exceeds the product's stock at the time of the
///   write. The stock check and the write happen in one statement, so
///   concurrent increments compose rather than overwrite each other.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Lines for a session joined with live product data, newest first.
    async fn list(&self, session: &str) -> Result<Vec<CartItem>>;

    /// Add `quantity` units of a product to a session's cart.
    async fn add(&self, session: &str, product_id: i64, quantity: i64) -> Result<AddOutcome>;

    /// Set the quantity of an existing line.
    ///
    /// Fails with `InvalidQuantity` below 1, `CartItemNotFound` for an unknown
    /// line, and `InsufficientStock` when the product can't cover it. A
    /// failed update leaves the stored quantity unchanged.
    async fn update_quantity(&self, id: i64, quantity: i64) -> Result<CartLine>;

    /// Delete a line, returning what was removed.
    async fn remove(&self, id: i64) -> Result<CartLine>;

    /// Delete every line of a session. Returns the number removed; clearing
    /// an empty cart is not an error.
    async fn clear(&self, session: &str) -> Result<u64>;
}
