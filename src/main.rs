//! Shielded Pool Tracker
//!
//! Entry point. Invoked by an external scheduler (every 8 hours); takes no
//! arguments. Loads configuration, initialises structured logging, runs a
//! single fetch→merge→save pass and maps the outcome to an exit status:
//! saved or skipped exits 0, any error exits 1.

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use shielded_tracker::config::{self, AppConfig};
use shielded_tracker::engine::runner;
use shielded_tracker::extractor::PoolExtractor;
use shielded_tracker::source::explorer::ExplorerClient;
use shielded_tracker::types::{RunOutcome, TrackerError};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load_or_default(config::DEFAULT_CONFIG_FILE)?;
    info!(
        url = %cfg.source.url,
        data_file = %cfg.storage.data_file,
        max_entries = cfg.storage.max_entries,
        "Shielded pool tracker starting"
    );

    match run(&cfg).await {
        Ok(RunOutcome::Saved { action, date, entries }) => {
            info!(%action, %date, entries, "Run complete");
            Ok(())
        }
        Ok(RunOutcome::Skipped) => {
            info!("Run skipped, history unchanged");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            std::process::exit(1);
        }
    }
}

/// Build the source and extractor, then run one pass.
async fn run(cfg: &AppConfig) -> Result<RunOutcome, TrackerError> {
    let source = ExplorerClient::new(&cfg.source)?;
    let extractor = PoolExtractor::new(&cfg.extractor)?;
    runner::run_once(cfg, &source, &extractor, Utc::now()).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shielded_tracker=info"));

    let json_logging = std::env::var("TRACKER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}
