//! greenshelf-server: storefront REST API
//!
//! ## Architecture
//! ```text
//! [Storefront UI] -> [REST API :3000] -> [SQLite/Postgres]
//!                          |
//!                          v
//!                   [Scoring service]
//! ```
//!
//! ## Configuration
//! - GREENSHELF_CONFIG: YAML config path (default: ./config.yaml if present)
//! - GREENSHELF_SERVER__PORT / PORT: REST API port (default: 3000)
//! - DATABASE_URL: `sqlite:<path>` or `postgres://...`
//! - SCORING_API_URL: scoring service base URL (default: http://localhost:5000)
//! - GREENSHELF_LOG: tracing filter (default: info)

use std::sync::Arc;

use tracing::info;

use greenshelf::api::{self, AppState};
use greenshelf::config::Config;
use greenshelf::scoring::HttpScoringClient;
use greenshelf::storage::Storage;
use greenshelf::utils::bootstrap::{init_tracing, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        storage = %config.storage.storage_type,
        scoring = %config.scoring.base_url,
        "starting greenshelf-server"
    );

    let storage = Storage::connect(&config.storage).await?;
    let scorer = Arc::new(HttpScoringClient::new(&config.scoring)?);
    let state = AppState::new(&storage, scorer);

    let listener = api::bind(&config.server.host, config.server.port).await?;
    let served = api::serve(listener, state, shutdown_signal()).await;

    storage.close().await;
    served?;
    Ok(())
}
