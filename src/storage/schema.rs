//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! The tables themselves are created by the migrations under `migrations/`.

use sea_query::Iden;

/// Products table schema.
#[derive(Iden, Clone, Copy)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "description"]
    Description,
    /// Whole cents.
    #[iden = "price_cents"]
    PriceCents,
    #[iden = "image_url"]
    ImageUrl,
    /// Nullable; NULL means "not yet scored".
    #[iden = "sustainability_index"]
    SustainabilityIndex,
    #[iden = "stock_quantity"]
    StockQuantity,
}

/// Columns selected for a full product row.
pub const PRODUCT_COLUMNS: [Products; 7] = [
    Products::Id,
    Products::Name,
    Products::Description,
    Products::PriceCents,
    Products::ImageUrl,
    Products::SustainabilityIndex,
    Products::StockQuantity,
];

/// Cart items table schema.
///
/// Unique on `(product_id, user_session)`: one line per product per session.
#[derive(Iden, Clone, Copy)]
pub enum CartItems {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "product_id"]
    ProductId,
    #[iden = "quantity"]
    Quantity,
    #[iden = "user_session"]
    UserSession,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

/// Columns selected for a stored cart line.
pub const CART_LINE_COLUMNS: [CartItems; 6] = [
    CartItems::Id,
    CartItems::ProductId,
    CartItems::Quantity,
    CartItems::UserSession,
    CartItems::CreatedAt,
    CartItems::UpdatedAt,
];
