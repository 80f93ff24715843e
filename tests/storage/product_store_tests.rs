//! ProductStore interface tests.
//!
//! These tests verify the contract of the ProductStore trait.
//! Each storage implementation should run these tests.
//!
//! Tests only look at the products they create, so they can share a
//! database with other tests.

use greenshelf::model::{NewProduct, Product};
use greenshelf::storage::{ProductStore, StorageError};
use rust_decimal::Decimal;

async fn create<S: ProductStore>(store: &S, name: &str, score: Option<f64>) -> Product {
    let mut product = NewProduct::new(name, format!("{name} description"), Decimal::new(950, 2), 10).with_image("/img/p.png");
    product.sustainability_index = score;
    store.create(product).await.expect("create should succeed")
}

fn only<'a>(products: &'a [Product], ids: &[i64]) -> Vec<&'a Product> {
    products.iter().filter(|p| ids.contains(&p.id)).collect()
}

// =============================================================================
// ProductStore::create / get tests
// =============================================================================

pub async fn test_create_and_get<S: ProductStore>(store: &S) {
    let created = store
        .create(
            NewProduct::new("test_kettle", "Stainless steel kettle", Decimal::new(2499, 2), 7)
                .with_image("/img/kettle.png")
                .with_score(6.5),
        )
        .await
        .expect("create should succeed");

    assert!(created.id > 0, "should assign an id");
    assert_eq!(created.name, "test_kettle");
    assert_eq!(created.price, Decimal::new(2499, 2));
    assert_eq!(created.stock_quantity, 7);
    assert_eq!(created.sustainability_index, Some(6.5));

    let fetched = store.get(created.id).await.expect("get should succeed");
    assert_eq!(fetched, created, "get should return the stored product");
}

pub async fn test_get_nonexistent<S: ProductStore>(store: &S) {
    let result = store.get(9_999_999).await;
    assert!(
        matches!(result, Err(StorageError::ProductNotFound(9_999_999))),
        "unknown id should be ProductNotFound"
    );
}

pub async fn test_create_rejects_invalid_score<S: ProductStore>(store: &S) {
    let result = store
        .create(NewProduct::new("test_bad", "", Decimal::ONE, 1).with_score(10.5))
        .await;
    assert!(matches!(result, Err(StorageError::InvalidScore(_))));
}

pub async fn test_prices_round_trip_exactly<S: ProductStore>(store: &S) {
    let mut total = Decimal::ZERO;
    for (name, cents) in [("test_price_a", 57), ("test_price_b", 4759), ("test_price_c", 184)] {
        let created = store
            .create(NewProduct::new(name, "", Decimal::new(cents, 2), 1))
            .await
            .expect("create should succeed");
        let fetched = store.get(created.id).await.expect("get should succeed");
        assert_eq!(fetched.price, Decimal::new(cents, 2));
        total += fetched.price;
    }
    assert_eq!(total, Decimal::new(5000, 2), "stored prices should sum exactly");
}

pub async fn test_create_rejects_invalid_price<S: ProductStore>(store: &S) {
    for price in [Decimal::new(-100, 2), Decimal::new(1999, 3)] {
        let result = store.create(NewProduct::new("test_bad_price", "", price, 1)).await;
        assert!(
            matches!(result, Err(StorageError::InvalidPrice(p)) if p == price),
            "{price} should be rejected"
        );
    }
}

// =============================================================================
// ProductStore::list tests
// =============================================================================

pub async fn test_list_orders_by_id<S: ProductStore>(store: &S) {
    let a = create(store, "test_list_a", None).await;
    let b = create(store, "test_list_b", Some(3.0)).await;
    let c = create(store, "test_list_c", None).await;

    let products = store.list().await.expect("list should succeed");
    let ids: Vec<i64> = only(&products, &[a.id, b.id, c.id]).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);

    let mut all_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let listed = all_ids.clone();
    all_ids.sort_unstable();
    assert_eq!(listed, all_ids, "list should be ordered by id");
}

pub async fn test_list_unscored<S: ProductStore>(store: &S) {
    let unscored = create(store, "test_unscored", None).await;
    let scored = create(store, "test_scored", Some(5.0)).await;

    let products = store.list_unscored().await.expect("list_unscored should succeed");
    assert!(products.iter().any(|p| p.id == unscored.id));
    assert!(!products.iter().any(|p| p.id == scored.id));
    assert!(products.iter().all(|p| p.sustainability_index.is_none()));
}

pub async fn test_list_by_score<S: ProductStore>(store: &S) {
    let low = create(store, "test_rank_low", Some(1.5)).await;
    let none = create(store, "test_rank_none", None).await;
    let high = create(store, "test_rank_high", Some(9.0)).await;
    let tie = create(store, "test_rank_tie", Some(9.0)).await;

    let products = store.list_by_score().await.expect("list_by_score should succeed");
    let ids: Vec<i64> = only(&products, &[low.id, none.id, high.id, tie.id])
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(
        ids,
        vec![high.id, tie.id, low.id, none.id],
        "highest first, ties by id, unscored last"
    );

    let first_unscored = products
        .iter()
        .position(|p| p.sustainability_index.is_none())
        .unwrap_or(products.len());
    assert!(
        products[first_unscored..].iter().all(|p| p.sustainability_index.is_none()),
        "no scored product after an unscored one"
    );
}

// =============================================================================
// ProductStore::ensure_stock tests
// =============================================================================

pub async fn test_ensure_stock<S: ProductStore>(store: &S) {
    let product = create(store, "test_stock", None).await;

    let checked = store.ensure_stock(product.id, 10).await.expect("full stock should pass");
    assert_eq!(checked.id, product.id);

    let result = store.ensure_stock(product.id, 11).await;
    assert!(matches!(
        result,
        Err(StorageError::InsufficientStock {
            requested: 11,
            available: 10
        })
    ));

    let result = store.ensure_stock(product.id, 0).await;
    assert!(matches!(result, Err(StorageError::InvalidQuantity(0))));

    let result = store.ensure_stock(9_999_999, 1).await;
    assert!(matches!(result, Err(StorageError::ProductNotFound(_))));
}

// =============================================================================
// ProductStore::update_score tests
// =============================================================================

pub async fn test_update_score<S: ProductStore>(store: &S) {
    let product = create(store, "test_update_score", None).await;

    store
        .update_score(product.id, 7.5)
        .await
        .expect("update_score should succeed");

    let fetched = store.get(product.id).await.unwrap();
    assert_eq!(fetched.sustainability_index, Some(7.5));
}

pub async fn test_update_score_validation<S: ProductStore>(store: &S) {
    let product = create(store, "test_update_invalid", Some(4.0)).await;

    for bad in [f64::NAN, f64::INFINITY, -0.1, 10.01] {
        let result = store.update_score(product.id, bad).await;
        assert!(
            matches!(result, Err(StorageError::InvalidScore(_))),
            "{bad} should be rejected"
        );
    }

    let fetched = store.get(product.id).await.unwrap();
    assert_eq!(fetched.sustainability_index, Some(4.0), "score should be unchanged");

    let result = store.update_score(9_999_999, 5.0).await;
    assert!(matches!(result, Err(StorageError::ProductNotFound(9_999_999))));
}

/// Macro to run all ProductStore tests against a store implementation.
#[macro_export]
macro_rules! run_product_store_tests {
    ($store:expr) => {
        use $crate::storage::product_store_tests::*;

        test_create_and_get($store).await;
        println!("  test_create_and_get: PASSED");

        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_create_rejects_invalid_score($store).await;
        println!("  test_create_rejects_invalid_score: PASSED");

        test_prices_round_trip_exactly($store).await;
        println!("  test_prices_round_trip_exactly: PASSED");

        test_create_rejects_invalid_price($store).await;
        println!("  test_create_rejects_invalid_price: PASSED");

        test_list_orders_by_id($store).await;
        println!("  test_list_orders_by_id: PASSED");

        test_list_unscored($store).await;
        println!("  test_list_unscored: PASSED");

        test_list_by_score($store).await;
        println!("  test_list_by_score: PASSED");

        test_ensure_stock($store).await;
        println!("  test_ensure_stock: PASSED");

        test_update_score($store).await;
        println!("  test_update_score: PASSED");

        test_update_score_validation($store).await;
        println!("  test_update_score_validation: PASSED");
    };
}
