//! Shared storage integration tests.
//!
//! Tests the ProductStore and CartStore interfaces against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod cart_store_tests;
pub mod product_store_tests;
