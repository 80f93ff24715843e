//! Greenshelf - storefront backend with ML-scored product sustainability
//!
//! A product catalog and per-session carts served over REST, a gateway to
//! an external scoring service that rates product descriptions, a backfill
//! that scores the catalog, and the client-side state logic of the shop.

pub mod api;
pub mod config;
pub mod model;
pub mod scoring;
pub mod storage;
pub mod storefront;
pub mod sustainability;
pub mod sync;
pub mod utils;
