//! Runner: one fetch → extract → load → merge → save pass.
//!
//! Every stage returns a `Result`; the first error aborts the run before
//! anything is written. Mapping outcomes to exit codes is left to `main`.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::engine::merger::{merge_snapshot, MergeOutcome};
use crate::extractor::PoolExtractor;
use crate::fmt::zec;
use crate::source::PageSource;
use crate::storage;
use crate::types::{MergeAction, Pool, PoolSnapshot, RunOutcome, TrackerError};

/// Run the pipeline once, stamping the observation with `now`.
pub async fn run_once(
    config: &AppConfig,
    source: &dyn PageSource,
    extractor: &PoolExtractor,
    now: DateTime<Utc>,
) -> Result<RunOutcome, TrackerError> {
    let today = now.date_naive();
    info!(source = source.name(), timestamp = %now.to_rfc3339(), "Fetching shielded pool data");

    // 1. Fetch and extract
    let html = source.fetch_page().await?;
    let snapshot = extractor.extract(&html)?;
    log_snapshot(&snapshot);

    // 2. Load prior history
    let data_file = config.storage.data_file.as_str();
    let history = storage::load_history(data_file)?;

    // 3. Merge
    let (history, action, dropped) = match merge_snapshot(
        history,
        today,
        now,
        &snapshot,
        config.storage.max_entries,
    ) {
        MergeOutcome::Merged { history, action, dropped } => (history, action, dropped),
        MergeOutcome::Skipped => {
            warn!("Total is 0, skipping update");
            return Ok(RunOutcome::Skipped);
        }
    };

    match action {
        MergeAction::Updated => info!(date = %today, "Updated existing entry for {today}"),
        MergeAction::Inserted => info!(date = %today, "Added new entry for {today}"),
    }
    if dropped > 0 {
        info!(dropped, max_entries = config.storage.max_entries, "Dropped records outside retention window");
    }

    // 4. Persist
    storage::save_history(&history, data_file)?;
    info!(entries = history.len(), path = data_file, "Saved {} entries to {data_file}", history.len());

    Ok(RunOutcome::Saved {
        action,
        date: today,
        entries: history.len(),
    })
}

/// Log each pool balance and the total.
fn log_snapshot(snapshot: &PoolSnapshot) {
    for pool in Pool::ALL {
        info!(pool = pool.name(), "{:<8} {}", format!("{pool}:"), zec(snapshot.get(pool)));
    }
    info!("{:<8} {}", "TOTAL:", zec(snapshot.total()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
