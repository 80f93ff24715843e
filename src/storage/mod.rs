//! Storage implementations.
//!
//! Products and cart lines live in one relational database, reached through a
//! single connection pool. The pool is opened and migrated by
//! [`Storage::connect`] and closed by [`Storage::close`].

use std::sync::Arc;

use tracing::info;

mod cart_store;
mod config;
mod product_store;
pub mod schema;
pub mod sql;

pub use cart_store::CartStore;
pub use config::{PostgresConfig, SqliteConfig, StorageConfig, StorageType, SQLITE_MEMORY};
pub use product_store::ProductStore;

#[cfg(feature = "sqlite")]
pub use sql::sqlite::{SqliteCartStore, SqliteProductStore};

#[cfg(feature = "postgres")]
pub use sql::postgres::{PostgresCartStore, PostgresProductStore};

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one storage backend: `sqlite` or `postgres`");

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Product not found: id={0}")]
    ProductNotFound(i64),

    #[error("Cart item not found: id={0}")]
    CartItemNotFound(i64),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid price: {0}")]
    InvalidPrice(rust_decimal::Decimal),

    #[error("Invalid sustainability score: {0}")]
    InvalidScore(f64),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Storage type '{0}' is not enabled in this build")]
    BackendDisabled(StorageType),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Pool behind the stores, kept so it can be closed on shutdown.
#[derive(Clone)]
enum DatabasePool {
    #[cfg(feature = "sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgPool),
}

/// Opened storage: one pool, one store per concern.
#[derive(Clone)]
pub struct Storage {
    pub products: Arc<dyn ProductStore>,
    pub carts: Arc<dyn CartStore>,
    pool: DatabasePool,
}

impl Storage {
    /// Open the configured database and run pending migrations.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        info!(storage = %config.storage_type, "opening storage");

        match config.storage_type {
            #[cfg(feature = "sqlite")]
            StorageType::Sqlite => {
                let pool = sql::sqlite::connect(&config.sqlite, config.max_connections).await?;
                Self::sqlite(pool).await
            }
            #[cfg(feature = "postgres")]
            StorageType::Postgres => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.postgres.uri)
                    .await?;
                Self::postgres(pool).await
            }
            #[allow(unreachable_patterns)]
            other => Err(StorageError::BackendDisabled(other)),
        }
    }

    /// Wrap an existing SQLite pool, migrating it first.
    #[cfg(feature = "sqlite")]
    pub async fn sqlite(pool: sqlx::SqlitePool) -> Result<Self> {
        sqlx::migrate!("migrations/sqlite").run(&pool).await?;

        Ok(Self {
            products: Arc::new(SqliteProductStore::new(pool.clone())),
            carts: Arc::new(SqliteCartStore::new(pool.clone())),
            pool: DatabasePool::Sqlite(pool),
        })
    }

    /// Wrap an existing PostgreSQL pool, migrating it first.
    #[cfg(feature = "postgres")]
    pub async fn postgres(pool: sqlx::PgPool) -> Result<Self> {
        sqlx::migrate!("migrations/postgres").run(&pool).await?;

        Ok(Self {
            products: Arc::new(PostgresProductStore::new(pool.clone())),
            carts: Arc::new(PostgresCartStore::new(pool.clone())),
            pool: DatabasePool::Postgres(pool),
        })
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => pool.close().await,
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => pool.close().await,
        }
        info!("storage closed");
    }
}
