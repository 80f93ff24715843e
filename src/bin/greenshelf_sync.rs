//! greenshelf-sync: sustainability score backfill
//!
//! Scores every product that has no sustainability index yet by calling the
//! scoring service, then prints a summary of the catalog.
//!
//! ```text
//! greenshelf-sync              # probe, backfill, summarize
//! greenshelf-sync run --skip-probe --delay-ms 250
//! greenshelf-sync test         # probe the scoring service only
//! greenshelf-sync summary      # summarize without scoring
//! ```

use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use greenshelf::config::Config;
use greenshelf::scoring::{HttpScoringClient, PROBE_DESCRIPTION};
use greenshelf::storage::Storage;
use greenshelf::sync::{probe, Backfill};
use greenshelf::utils::bootstrap::init_tracing;

#[derive(Parser)]
#[command(name = "greenshelf-sync")]
#[command(about = "Backfill product sustainability scores from the scoring service")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score all unscored products, then print the summary
    Run {
        /// Don't check the scoring service before starting
        #[arg(long)]
        skip_probe: bool,

        /// Pause between scoring calls in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Check that the scoring service answers
    Test,
    /// Print the score summary without scoring anything
    Summary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Run {
        skip_probe: false,
        delay_ms: None,
    });

    match command {
        Commands::Test => {
            if !run_probe(&config).await {
                process::exit(1);
            }
        }
        Commands::Summary => {
            let storage = Storage::connect(&config.storage).await?;
            let scorer = Arc::new(HttpScoringClient::new(&config.scoring)?);
            let backfill = Backfill::new(storage.products.clone(), scorer, Duration::ZERO);
            let summary = backfill.summary().await;
            storage.close().await;
            print!("{}", summary?);
        }
        Commands::Run { skip_probe, delay_ms } => {
            if !skip_probe && !run_probe(&config).await {
                error!("scoring service probe failed; not starting the backfill");
                process::exit(1);
            }

            let delay = delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.sync.delay());

            let storage = Storage::connect(&config.storage).await?;
            let scorer = Arc::new(HttpScoringClient::new(&config.scoring)?);
            let backfill = Backfill::new(storage.products.clone(), scorer, delay);

            let outcome = async {
                let report = backfill.run().await?;
                let summary = backfill.summary().await?;
                Ok::<_, greenshelf::storage::StorageError>((report, summary))
            }
            .await;
            storage.close().await;

            let (report, summary) = outcome?;
            print!("{report}");
            println!();
            print!("{summary}");
        }
    }

    Ok(())
}

/// Score the probe description with the short probe timeout.
async fn run_probe(config: &Config) -> bool {
    let client = match HttpScoringClient::with_timeout(&config.scoring, config.scoring.probe_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build scoring client");
            return false;
        }
    };

    info!(endpoint = %client.endpoint(), description = PROBE_DESCRIPTION, "probing scoring service");
    match probe(&client).await {
        Ok(Some(score)) => {
            println!("Scoring service is working. Test prediction: {score}");
            true
        }
        Ok(None) => {
            println!("Scoring service answered, but without a usable score.");
            true
        }
        Err(e) => {
            println!("Scoring service test failed: {e}");
            println!("Make sure the scoring service is running on: {}", config.scoring.base_url);
            false
        }
    }
}
