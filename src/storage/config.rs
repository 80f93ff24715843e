//! Storage configuration types.

use serde::Deserialize;

/// In-memory SQLite path.
pub const SQLITE_MEMORY: &str = ":memory:";

/// Storage type discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Sqlite,
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Sqlite => f.write_str("sqlite"),
            StorageType::Postgres => f.write_str("postgres"),
        }
    }
}

/// Storage configuration (discriminated union).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// SQLite-specific configuration.
    pub sqlite: SqliteConfig,
    /// PostgreSQL-specific configuration.
    pub postgres: PostgresConfig,
    /// Upper bound on pooled connections. In-memory SQLite always uses one.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Sqlite,
            sqlite: SqliteConfig::default(),
            postgres: PostgresConfig::default(),
            max_connections: 5,
        }
    }
}

impl StorageConfig {
    /// In-memory SQLite, for tests.
    pub fn in_memory() -> Self {
        Self {
            sqlite: SqliteConfig {
                path: SQLITE_MEMORY.to_string(),
            },
            ..Self::default()
        }
    }

    /// Point storage at a connection URL.
    ///
    /// `postgres://` and `postgresql://` select PostgreSQL; `sqlite:` selects
    /// SQLite with the remainder as the path. Anything else is left alone and
    /// reported as unrecognised.
    pub fn apply_database_url(&mut self, url: &str) -> bool {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            self.storage_type = StorageType::Postgres;
            self.postgres.uri = url.to_string();
            true
        } else if let Some(rest) = url.strip_prefix("sqlite:") {
            let path = rest.trim_start_matches("//");
            self.storage_type = StorageType::Sqlite;
            self.sqlite.path = if path.is_empty() {
                SQLITE_MEMORY.to_string()
            } else {
                path.to_string()
            };
            true
        } else {
            false
        }
    }
}

/// SQLite-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file, or `:memory:`.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "./data/greenshelf.db".to_string(),
        }
    }
}

/// PostgreSQL-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URI.
    pub uri: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://localhost:5432/greenshelf".to_string(),
        }
    }
}
