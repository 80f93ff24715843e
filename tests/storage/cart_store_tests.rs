//! CartStore interface tests.
//!
//! These tests verify the contract of the CartStore trait.
//! Each storage implementation should run these tests.
//!
//! Every test uses its own session and products.

use greenshelf::model::{NewProduct, Product};
use greenshelf::storage::{CartStore, ProductStore, StorageError};
use rust_decimal::Decimal;

async fn product<P: ProductStore>(products: &P, name: &str, stock: i64) -> Product {
    products
        .create(NewProduct::new(name, format!("{name} description"), Decimal::new(250, 2), stock).with_score(8.0))
        .await
        .expect("create should succeed")
}

// =============================================================================
// CartStore::add tests
// =============================================================================

pub async fn test_add_creates_line<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_add_creates";
    let item = product(products, "test_cart_add", 5).await;

    let outcome = carts.add(session, item.id, 2).await.expect("add should succeed");
    assert!(outcome.created, "first add should create a line");
    assert_eq!(outcome.line.product_id, item.id);
    assert_eq!(outcome.line.quantity, 2);
    assert_eq!(outcome.line.user_session, session);
    assert!(!outcome.line.created_at.is_empty());
}

pub async fn test_add_twice_increments<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_add_twice";
    let item = product(products, "test_cart_twice", 5).await;

    let first = carts.add(session, item.id, 1).await.unwrap();
    let second = carts.add(session, item.id, 2).await.unwrap();

    assert!(!second.created, "second add should update the existing line");
    assert_eq!(second.line.id, first.line.id);
    assert_eq!(second.line.quantity, 3);

    let lines = carts.list(session).await.unwrap();
    assert_eq!(lines.len(), 1, "one line per product per session");
    assert_eq!(lines[0].quantity, 3);
}

pub async fn test_add_validation<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_add_validation";
    let item = product(products, "test_cart_validation", 2).await;

    let result = carts.add(session, item.id, 0).await;
    assert!(matches!(result, Err(StorageError::InvalidQuantity(0))));

    let result = carts.add(session, 9_999_999, 1).await;
    assert!(matches!(result, Err(StorageError::ProductNotFound(9_999_999))));

    let result = carts.add(session, item.id, 3).await;
    assert!(matches!(
        result,
        Err(StorageError::InsufficientStock {
            requested: 3,
            available: 2
        })
    ));

    assert!(carts.list(session).await.unwrap().is_empty(), "failed adds write nothing");
}

pub async fn test_add_rechecks_combined_total<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_add_total";
    let item = product(products, "test_cart_total", 3).await;

    carts.add(session, item.id, 2).await.unwrap();
    let result = carts.add(session, item.id, 2).await;
    assert!(matches!(
        result,
        Err(StorageError::InsufficientStock {
            requested: 4,
            available: 3
        })
    ));

    let lines = carts.list(session).await.unwrap();
    assert_eq!(lines[0].quantity, 2, "refused increment leaves quantity unchanged");
}

pub async fn test_concurrent_adds_compose<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_add_concurrent";
    let item = product(products, "test_cart_concurrent", 10).await;

    carts.add(session, item.id, 1).await.unwrap();
    let (a, b) = tokio::join!(carts.add(session, item.id, 2), carts.add(session, item.id, 3));
    a.expect("first concurrent add");
    b.expect("second concurrent add");

    let lines = carts.list(session).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 6, "increments should compose");
}

// =============================================================================
// CartStore::list tests
// =============================================================================

pub async fn test_list_joins_live_product_data<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_list_join";
    let older = product(products, "test_cart_older", 5).await;
    let newer = product(products, "test_cart_newer", 5).await;

    carts.add(session, older.id, 1).await.unwrap();
    carts.add(session, newer.id, 4).await.unwrap();
    products.update_score(older.id, 2.0).await.unwrap();

    let lines = carts.list(session).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, newer.id, "newest line first");
    assert_eq!(lines[0].name, "test_cart_newer");
    assert_eq!(lines[0].price, Decimal::new(250, 2));
    assert_eq!(lines[0].stock_quantity, 5);
    assert_eq!(lines[1].sustainability_index, Some(2.0), "product data is live");
}

pub async fn test_sessions_are_isolated<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let item = product(products, "test_cart_isolated", 5).await;

    carts.add("test_iso_a", item.id, 1).await.unwrap();
    let b = carts.add("test_iso_b", item.id, 1).await.unwrap();
    assert!(b.created, "other session gets its own line");

    assert_eq!(carts.list("test_iso_a").await.unwrap().len(), 1);
    assert_eq!(carts.list("test_iso_b").await.unwrap().len(), 1);
    assert!(carts.list("test_iso_none").await.unwrap().is_empty());
}

// =============================================================================
// CartStore::update_quantity tests
// =============================================================================

pub async fn test_update_quantity<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_update_qty";
    let item = product(products, "test_cart_update", 5).await;
    let line = carts.add(session, item.id, 1).await.unwrap().line;

    let updated = carts.update_quantity(line.id, 5).await.expect("update should succeed");
    assert_eq!(updated.id, line.id);
    assert_eq!(updated.quantity, 5);
    assert!(updated.updated_at >= line.updated_at);
}

pub async fn test_update_quantity_failures<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_update_fail";
    let item = product(products, "test_cart_update_fail", 3).await;
    let line = carts.add(session, item.id, 2).await.unwrap().line;

    let result = carts.update_quantity(line.id, 4).await;
    assert!(matches!(
        result,
        Err(StorageError::InsufficientStock {
            requested: 4,
            available: 3
        })
    ));

    let result = carts.update_quantity(line.id, 0).await;
    assert!(matches!(result, Err(StorageError::InvalidQuantity(0))));

    let result = carts.update_quantity(9_999_999, 1).await;
    assert!(matches!(result, Err(StorageError::CartItemNotFound(9_999_999))));

    let lines = carts.list(session).await.unwrap();
    assert_eq!(lines[0].quantity, 2, "failed updates leave quantity unchanged");
}

// =============================================================================
// CartStore::remove / clear tests
// =============================================================================

pub async fn test_remove<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_remove";
    let item = product(products, "test_cart_remove", 5).await;
    let line = carts.add(session, item.id, 1).await.unwrap().line;

    let removed = carts.remove(line.id).await.expect("remove should succeed");
    assert_eq!(removed.id, line.id);
    assert!(carts.list(session).await.unwrap().is_empty());

    let result = carts.remove(line.id).await;
    assert!(matches!(result, Err(StorageError::CartItemNotFound(_))));
}

pub async fn test_clear<P: ProductStore, C: CartStore>(products: &P, carts: &C) {
    let session = "test_clear";
    let a = product(products, "test_cart_clear_a", 5).await;
    let b = product(products, "test_cart_clear_b", 5).await;
    carts.add(session, a.id, 1).await.unwrap();
    carts.add(session, b.id, 1).await.unwrap();
    carts.add("test_clear_other", a.id, 1).await.unwrap();

    assert_eq!(carts.clear(session).await.unwrap(), 2);
    assert!(carts.list(session).await.unwrap().is_empty());
    assert_eq!(carts.list("test_clear_other").await.unwrap().len(), 1);

    assert_eq!(carts.clear(session).await.unwrap(), 0, "clearing an empty cart succeeds");
}

/// Macro to run all CartStore tests against a store implementation.
#[macro_export]
macro_rules! run_cart_store_tests {
    ($products:expr, $carts:expr) => {
        use $crate::storage::cart_store_tests::*;

        test_add_creates_line($products, $carts).await;
        println!("  test_add_creates_line: PASSED");

        test_add_twice_increments($products, $carts).await;
        println!("  test_add_twice_increments: PASSED");

        test_add_validation($products, $carts).await;
        println!("  test_add_validation: PASSED");

        test_add_rechecks_combined_total($products, $carts).await;
        println!("  test_add_rechecks_combined_total: PASSED");

        test_concurrent_adds_compose($products, $carts).await;
        println!("  test_concurrent_adds_compose: PASSED");

        test_list_joins_live_product_data($products, $carts).await;
        println!("  test_list_joins_live_product_data: PASSED");

        test_sessions_are_isolated($products, $carts).await;
        println!("  test_sessions_are_isolated: PASSED");

        test_update_quantity($products, $carts).await;
        println!("  test_update_quantity: PASSED");

        test_update_quantity_failures($products, $carts).await;
        println!("  test_update_quantity_failures: PASSED");

        test_remove($products, $carts).await;
        println!("  test_remove: PASSED");

        test_clear($products, $carts).await;
        println!("  test_clear: PASSED");
    };
}
