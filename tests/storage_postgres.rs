//! PostgreSQL storage integration tests using testcontainers.
//!
//! Run with: cargo test --test storage_postgres --features postgres -- --nocapture
//!
//! These tests spin up PostgreSQL in a container using testcontainers-rs,
//! run migrations, and test all storage interfaces.

mod storage;

use std::time::Duration;

use greenshelf::storage::{PostgresCartStore, PostgresProductStore};
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage, ImageExt,
};

/// Start PostgreSQL container.
///
/// Returns (container, connection_string) where connection_string is suitable
/// for sqlx PgPool connection.
async fn start_postgres() -> (testcontainers::ContainerAsync<GenericImage>, String) {
    // PostgreSQL logs readiness once during init and again when actually up.
    let image = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ));

    let container = image
        .with_env_var("POSTGRES_USER", "greenshelf")
        .with_env_var("POSTGRES_PASSWORD", "greenshelf")
        .with_env_var("POSTGRES_DB", "greenshelf")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start postgres container");

    tokio::time::sleep(Duration::from_secs(1)).await;

    let host_port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get mapped port");

    let host = container
        .get_host()
        .await
        .expect("Failed to get container host");

    let connection_string = format!("postgres://greenshelf:greenshelf@{}:{}/greenshelf", host, host_port);

    println!("PostgreSQL available at: {}", connection_string);

    (container, connection_string)
}

/// Connect to PostgreSQL and run migrations.
async fn connect_and_migrate(connection_string: &str) -> sqlx::PgPool {
    let pool = sqlx::PgPool::connect(connection_string)
        .await
        .expect("Failed to connect to PostgreSQL");

    sqlx::migrate!("migrations/postgres")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

#[tokio::test]
async fn test_postgres_product_store() {
    println!("=== PostgreSQL ProductStore Tests ===");
    println!("Starting PostgreSQL container...");

    let (_container, connection_string) = start_postgres().await;
    let pool = connect_and_migrate(&connection_string).await;
    let store = PostgresProductStore::new(pool);

    println!("Running ProductStore tests...");
    run_product_store_tests!(&store);

    println!("=== All PostgreSQL ProductStore tests PASSED ===");
}

#[tokio::test]
async fn test_postgres_cart_store() {
    println!("=== PostgreSQL CartStore Tests ===");
    println!("Starting PostgreSQL container...");

    let (_container, connection_string) = start_postgres().await;
    let pool = connect_and_migrate(&connection_string).await;
    let products = PostgresProductStore::new(pool.clone());
    let carts = PostgresCartStore::new(pool);

    println!("Running CartStore tests...");
    run_cart_store_tests!(&products, &carts);

    println!("=== All PostgreSQL CartStore tests PASSED ===");
}
