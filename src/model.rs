//! Catalog and cart records shared by storage, the REST API and the
//! storefront client.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sustainability::{classify, Category, CategoryFields};

/// Session used when a request does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Prices are stored as whole cents.
pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Cents for a storable price: non-negative with at most two decimal places.
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    if price.is_sign_negative() || price.normalize().scale() > 2 {
        return None;
    }
    (price * Decimal::ONE_HUNDRED).to_i64()
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    /// `None` until the backfill has scored the product.
    pub sustainability_index: Option<f64>,
    pub stock_quantity: i64,
}

impl Product {
    pub fn category(&self) -> Category {
        classify(self.sustainability_index)
    }
}

/// Fields required to provision a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub stock_quantity: i64,
    pub sustainability_index: Option<f64>,
}

impl NewProduct {
    /// Unscored product with an empty image reference.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            image_url: String::new(),
            stock_quantity: stock,
            sustainability_index: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.sustainability_index = Some(score);
        self
    }
}

/// Product as served by the API, with derived category fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub category: CategoryFields,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let category = product.category().into();
        Self { product, category }
    }
}

/// A stored cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub user_session: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A cart line joined with the product's current attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub sustainability_index: Option<f64>,
    pub stock_quantity: i64,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart item as served by the API, with derived category fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemView {
    #[serde(flatten)]
    pub item: CartItem,
    #[serde(flatten)]
    pub category: CategoryFields,
}

impl From<CartItem> for CartItemView {
    fn from(item: CartItem) -> Self {
        let category = classify(item.sustainability_index).into();
        Self { item, category }
    }
}

/// Result of an add-to-cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub line: CartLine,
    /// `false` when an existing line was incremented.
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product {
            id: 7,
            name: "LED desk lamp".to_string(),
            description: "Aluminium lamp".to_string(),
            price: Decimal::new(3950, 2),
            image_url: "/img/lamp.png".to_string(),
            sustainability_index: Some(8.1),
            stock_quantity: 4,
        }
    }

    #[test]
    fn test_product_view_flattens_category() {
        let json = serde_json::to_value(ProductView::from(lamp())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["price"], 39.5);
        assert_eq!(json["sustainability_index"], 8.1);
        assert_eq!(json["sustainability_category"], "High");
        assert_eq!(json["sustainability_color"], "green");
        assert_eq!(json["sustainability_emoji"], "🟢");
    }

    #[test]
    fn test_unscored_product_serializes_null_index() {
        let mut product = lamp();
        product.sustainability_index = None;
        let json = serde_json::to_value(ProductView::from(product)).unwrap();
        assert!(json["sustainability_index"].is_null());
        assert_eq!(json["sustainability_category"], "Unknown");
    }

    #[test]
    fn test_cart_item_line_total() {
        let item = CartItem {
            id: 1,
            product_id: 7,
            quantity: 3,
            name: "LED desk lamp".to_string(),
            description: String::new(),
            price: Decimal::new(250, 2),
            image_url: String::new(),
            sustainability_index: None,
            stock_quantity: 10,
        };
        assert_eq!(item.line_total(), Decimal::new(750, 2));
    }

    #[test]
    fn test_price_cents_conversion() {
        assert_eq!(price_to_cents(Decimal::new(2499, 2)), Some(2499));
        assert_eq!(price_to_cents(Decimal::new(5, 0)), Some(500));
        assert_eq!(price_to_cents(Decimal::new(12500, 4)), Some(125));
        assert_eq!(price_to_cents(Decimal::new(1999, 3)), None);
        assert_eq!(price_to_cents(Decimal::new(-1, 2)), None);
        assert_eq!(price_from_cents(57), Decimal::new(57, 2));
    }
}
