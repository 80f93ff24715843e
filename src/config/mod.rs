//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod server;

pub use server::{ConfigError, ServerConfig};

use serde::Deserialize;

use crate::scoring::ScoringConfig;
use crate::storage::StorageConfig;
use crate::sync::SyncConfig;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "GREENSHELF_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "GREENSHELF";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "GREENSHELF_LOG";

/// Environment variable for server port.
pub const PORT_ENV_VAR: &str = "PORT";
/// Environment variable for database URL.
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
/// Environment variable for the scoring service base URL.
pub const SCORING_API_URL_ENV_VAR: &str = "SCORING_API_URL";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Scoring service configuration.
    pub scoring: ScoringConfig,
    /// Backfill configuration.
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    /// 5. `PORT`, `DATABASE_URL` and `SCORING_API_URL`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder =
            ConfigLib::builder().add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        config.apply_conventional_env()?;
        Ok(config)
    }

    /// Apply the conventional unprefixed variables on top of everything else.
    fn apply_conventional_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: PORT_ENV_VAR,
                value: port.clone(),
            })?;
        }

        if let Ok(url) = std::env::var(DATABASE_URL_ENV_VAR) {
            if !self.storage.apply_database_url(&url) {
                return Err(ConfigError::InvalidEnv {
                    var: DATABASE_URL_ENV_VAR,
                    value: url,
                });
            }
        }

        if let Ok(url) = std::env::var(SCORING_API_URL_ENV_VAR) {
            self.scoring.base_url = url;
        }

        Ok(())
    }

    /// Create config for testing: in-memory storage, no pacing.
    pub fn for_test() -> Self {
        Self {
            storage: StorageConfig::in_memory(),
            sync: SyncConfig { delay_ms: 0 },
            ..Self::default()
        }
    }
}
