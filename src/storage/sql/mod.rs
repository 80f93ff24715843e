//! Unified SQL storage implementations.
//!
//! This module provides shared implementations for SQL-based storage backends
//! (PostgreSQL, SQLite). The implementations are parameterized by database type
//! using the `SqlDatabase` trait.

mod cart_store;
mod product_store;
mod query;

pub use cart_store::SqlCartStore;
pub use product_store::SqlProductStore;
pub use query::{timestamp_now, SqlDatabase};

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::{DeleteStatement, InsertStatement, PostgresQueryBuilder, SelectStatement, UpdateStatement};
    use sea_query_binder::{SqlxBinder, SqlxValues};
    use sqlx::PgPool;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        fn build_select(stmt: &SelectStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(PostgresQueryBuilder)
        }

        fn build_insert(stmt: &InsertStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(PostgresQueryBuilder)
        }

        fn build_update(stmt: &UpdateStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(PostgresQueryBuilder)
        }

        fn build_delete(stmt: &DeleteStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL product store.
    pub type PostgresProductStore = super::SqlProductStore<Postgres>;

    /// PostgreSQL cart store.
    pub type PostgresCartStore = super::SqlCartStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use std::time::Duration;

    use sea_query::{DeleteStatement, InsertStatement, SelectStatement, SqliteQueryBuilder, UpdateStatement};
    use sea_query_binder::{SqlxBinder, SqlxValues};
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use tracing::debug;

    use crate::storage::{SqliteConfig, SQLITE_MEMORY};

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        fn build_select(stmt: &SelectStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(SqliteQueryBuilder)
        }

        fn build_insert(stmt: &InsertStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(SqliteQueryBuilder)
        }

        fn build_update(stmt: &UpdateStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(SqliteQueryBuilder)
        }

        fn build_delete(stmt: &DeleteStatement) -> (String, SqlxValues) {
            stmt.build_sqlx(SqliteQueryBuilder)
        }
    }

    /// SQLite product store.
    pub type SqliteProductStore = super::SqlProductStore<Sqlite>;

    /// SQLite cart store.
    pub type SqliteCartStore = super::SqlCartStore<Sqlite>;

    /// Open a SQLite pool with foreign keys enforced.
    ///
    /// `:memory:` databases are private to a connection, so they get a pool
    /// of exactly one.
    pub async fn connect(config: &SqliteConfig, max_connections: u32) -> crate::storage::Result<SqlitePool> {
        let in_memory = config.path == SQLITE_MEMORY;
        let (opts, max_connections) = if in_memory {
            (SqliteConnectOptions::new().filename(SQLITE_MEMORY), 1)
        } else {
            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let opts = SqliteConnectOptions::new()
                .filename(&config.path)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(30))
                .create_if_missing(true);
            (opts, max_connections)
        };

        debug!(path = %config.path, max_connections, "connecting to sqlite");

        let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            // The database dies with its connection.
            pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_opts.connect_with(opts.foreign_keys(true)).await?;

        Ok(pool)
    }
}
