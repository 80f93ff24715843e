//! SQL database abstraction trait.

use sea_query::{DeleteStatement, InsertStatement, SelectStatement, UpdateStatement};
use sea_query_binder::SqlxValues;

/// Trait for SQL database backends.
///
/// This trait abstracts over different SQL databases (PostgreSQL, SQLite)
/// by providing the pool type and query building method. Every builder
/// returns the SQL text with placeholders plus the values to bind, so user
/// input never ends up inside the statement text.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The connection pool type for this database.
    type Pool: Clone + Send + Sync;

    /// Build a parameterized SELECT.
    fn build_select(stmt: &SelectStatement) -> (String, SqlxValues);

    /// Build a parameterized INSERT.
    fn build_insert(stmt: &InsertStatement) -> (String, SqlxValues);

    /// Build a parameterized UPDATE.
    fn build_update(stmt: &UpdateStatement) -> (String, SqlxValues);

    /// Build a parameterized DELETE.
    fn build_delete(stmt: &DeleteStatement) -> (String, SqlxValues);
}

/// RFC 3339 timestamp with fixed-width microseconds, so text ordering
/// matches chronological ordering.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
