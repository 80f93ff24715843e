//! Storefront state: the side-effect-free logic behind the shop UI and a
//! typed client for the REST API.

mod cart;
mod catalog;
mod client;
mod session;

pub use cart::{format_price, CartSummary, FREE_SHIPPING_THRESHOLD, SHIPPING_FEE, TAX_RATE};
pub use catalog::{CatalogQuery, Filter, ParseOptionError, SortOrder};
pub use client::{ClientError, StorefrontClient};
pub use session::new_session_id;
