//! End-to-end runs of the tracker pipeline.

use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;

use shielded_tracker::config::AppConfig;
use shielded_tracker::engine::runner::run_once;
use shielded_tracker::extractor::PoolExtractor;
use shielded_tracker::storage;
use shielded_tracker::types::{MergeAction, RunOutcome, TrackerError};

use crate::mock_source::{explorer_page, MockSource};

/// Config pointing the history at a unique temp file.
fn temp_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    let mut p = std::env::temp_dir();
    p.push(format!("shielded_it_{}.json", uuid::Uuid::new_v4()));
    cfg.storage.data_file = p.to_string_lossy().to_string();
    cfg
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

async fn run(cfg: &AppConfig, source: &MockSource, now: DateTime<Utc>) -> Result<RunOutcome, TrackerError> {
    let extractor = PoolExtractor::new(&cfg.extractor).unwrap();
    run_once(cfg, source, &extractor, now).await
}

#[tokio::test]
async fn test_first_run_creates_history() {
    let cfg = temp_config();
    let source = MockSource::with_pools("100.0", "200.0", "300.0");
    let now = at(2024, 1, 1, 8);

    let outcome = run(&cfg, &source, now).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Saved {
            action: MergeAction::Inserted,
            date: now.date_naive(),
            entries: 1,
        }
    );

    let history = storage::load_history(&cfg.storage.data_file).unwrap();
    assert_eq!(history.len(), 1);
    let rec = &history[0];
    assert_eq!(rec.date.to_string(), "2024-01-01");
    assert_eq!(rec.timestamp, now);
    assert_eq!(rec.sprout, 100.0);
    assert_eq!(rec.sapling, 200.0);
    assert_eq!(rec.orchard, 300.0);
    assert_eq!(rec.total, 600.0);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_three_runs_a_day_keep_last() {
    let cfg = temp_config();
    let source = MockSource::with_pools("25,000.00", "1,000,000.00", "500,000.00");

    run(&cfg, &source, at(2024, 5, 10, 0)).await.unwrap();
    source.set_page(&explorer_page(Some("25,000.00"), Some("1,000,500.00"), Some("500,100.00")));
    run(&cfg, &source, at(2024, 5, 10, 8)).await.unwrap();
    source.set_page(&explorer_page(Some("24,999.00"), Some("1,001,000.00"), Some("500,200.00")));
    let outcome = run(&cfg, &source, at(2024, 5, 10, 16)).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Saved { action: MergeAction::Updated, entries: 1, .. }));
    assert_eq!(source.fetch_count(), 3);

    let history = storage::load_history(&cfg.storage.data_file).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sprout, 24999.0);
    assert_eq!(history[0].sapling, 1001000.0);
    assert_eq!(history[0].orchard, 500200.0);
    assert_eq!(history[0].timestamp, at(2024, 5, 10, 16));

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_rolling_window_across_days() {
    let mut cfg = temp_config();
    cfg.storage.max_entries = 3;
    let source = MockSource::with_pools("1", "2", "3");

    for day in 1..=5 {
        run(&cfg, &source, at(2024, 2, day, 8)).await.unwrap();
    }

    let history = storage::load_history(&cfg.storage.data_file).unwrap();
    let dates: Vec<String> = history.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-02-03", "2024-02-04", "2024-02-05"]);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_missing_pool_still_recorded() {
    let cfg = temp_config();
    let source = MockSource::with_page(&explorer_page(Some("1,234.56"), Some("7,000.00"), None));

    run(&cfg, &source, at(2024, 3, 1, 0)).await.unwrap();

    let history = storage::load_history(&cfg.storage.data_file).unwrap();
    assert_eq!(history[0].sprout, 1234.56);
    assert_eq!(history[0].sapling, 7000.0);
    assert_eq!(history[0].orchard, 0.0);
    assert!((history[0].total - 8234.56).abs() < 1e-9);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_zero_total_leaves_history_untouched() {
    let cfg = temp_config();
    let source = MockSource::with_pools("10", "20", "30");
    run(&cfg, &source, at(2024, 3, 1, 0)).await.unwrap();
    let before = fs::read_to_string(&cfg.storage.data_file).unwrap();

    source.set_page("<html><body>Explorer is under maintenance</body></html>");
    let outcome = run(&cfg, &source, at(2024, 3, 1, 8)).await.unwrap();
    assert_eq!(outcome, RunOutcome::Skipped);

    let after = fs::read_to_string(&cfg.storage.data_file).unwrap();
    assert_eq!(before, after);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_transport_error_leaves_history_untouched() {
    let cfg = temp_config();
    let source = MockSource::with_pools("10", "20", "30");
    run(&cfg, &source, at(2024, 3, 1, 0)).await.unwrap();
    let before = fs::read_to_string(&cfg.storage.data_file).unwrap();

    source.set_error(503);
    let err = run(&cfg, &source, at(2024, 3, 2, 0)).await.unwrap_err();
    assert!(matches!(err, TrackerError::Transport { status: Some(503), .. }));

    assert_eq!(fs::read_to_string(&cfg.storage.data_file).unwrap(), before);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_unparsable_amount_leaves_history_untouched() {
    let cfg = temp_config();
    let source = MockSource::with_pools("10", "20", "30");
    run(&cfg, &source, at(2024, 3, 1, 0)).await.unwrap();
    let before = fs::read_to_string(&cfg.storage.data_file).unwrap();

    source.set_page(&explorer_page(Some(",,,"), Some("20"), Some("30")));
    let err = run(&cfg, &source, at(2024, 3, 1, 8)).await.unwrap_err();
    assert!(matches!(err, TrackerError::Extraction { .. }));
    assert_eq!(fs::read_to_string(&cfg.storage.data_file).unwrap(), before);

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_corrupt_history_is_not_overwritten() {
    let cfg = temp_config();
    fs::write(&cfg.storage.data_file, "not json at all").unwrap();
    let source = MockSource::with_pools("10", "20", "30");

    let err = run(&cfg, &source, at(2024, 3, 1, 0)).await.unwrap_err();
    assert!(matches!(err, TrackerError::CorruptHistory { .. }));
    assert_eq!(fs::read_to_string(&cfg.storage.data_file).unwrap(), "not json at all");

    storage::delete_history(&cfg.storage.data_file).unwrap();
}

#[tokio::test]
async fn test_reads_history_written_by_older_tool() {
    let cfg = temp_config();
    let legacy = r#"[
  {
    "date": "2024-01-02",
    "timestamp": "2024-01-02T08:00:03.512345+00:00",
    "sprout": 25000.0,
    "sapling": 1000000.0,
    "orchard": 500000.0,
    "total": 1525000.0
  },
  {
    "date": "2024-01-01",
    "timestamp": "2024-01-01T16:00:01.000001+00:00",
    "sprout": 25001.0,
    "sapling": 999000.0,
    "orchard": 499000.0,
    "total": 1523001.0
  }
]"#;
    fs::write(&cfg.storage.data_file, legacy).unwrap();
    let source = MockSource::with_pools("1", "2", "3");

    let outcome = run(&cfg, &source, at(2024, 1, 3, 0)).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Saved { action: MergeAction::Inserted, entries: 3, .. }));

    let history = storage::load_history(&cfg.storage.data_file).unwrap();
    let dates: Vec<String> = history.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(history[1].total, 1525000.0);
    assert!(!Path::new(&format!("{}.tmp", cfg.storage.data_file)).exists());

    storage::delete_history(&cfg.storage.data_file).unwrap();
}
