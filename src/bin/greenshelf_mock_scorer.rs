//! greenshelf-mock-scorer: stand-in for the sustainability scoring service
//!
//! ## Configuration
//! - PORT: HTTP port (default: 5000)
//! - SCORE_RESPONSES: comma-separated keyword=score pairs
//!   Example: "bamboo=8.7,plastic=2.1,broken=error"
//! - MOCK_DEFAULT_SCORE: score for unmatched descriptions (default: 5.0)
//! - MOCK_SCORE_FIELD: response field name (default: sustainability_index)

use tracing::info;

use greenshelf::scoring::mock::{router, MockScorer};
use greenshelf::utils::bootstrap::{init_tracing, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mock = MockScorer::from_env();
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    info!(
        addr = %addr,
        responses = mock.responses.len(),
        field = %mock.field,
        "starting mock scoring service"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(mock))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
