//! Merger: folds today's snapshot into the daily history.
//!
//! Pure function, no I/O. Guarantees on the returned history:
//! ascending by date, unique dates, at most `max_entries` records
//! (the oldest are dropped first).

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{DailyRecord, MergeAction, PoolSnapshot};

/// Result of merging one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Merged {
        history: Vec<DailyRecord>,
        action: MergeAction,
        /// Records dropped by the retention window.
        dropped: usize,
    },
    /// Zero total: the input history is left untouched.
    Skipped,
}

/// Merge `snapshot` into `history` as the record for `today`.
///
/// A same-day record is replaced in place, so the last observation of the
/// day wins. A zero-total snapshot is treated as a failed extraction.
pub fn merge_snapshot(
    mut history: Vec<DailyRecord>,
    today: NaiveDate,
    timestamp: DateTime<Utc>,
    snapshot: &PoolSnapshot,
    max_entries: usize,
) -> MergeOutcome {
    if snapshot.is_empty() {
        return MergeOutcome::Skipped;
    }

    let record = DailyRecord::from_snapshot(today, timestamp, snapshot);

    let action = match history.iter().position(|r| r.date == today) {
        Some(idx) => {
            history[idx] = record;
            MergeAction::Updated
        }
        None => {
            history.push(record);
            MergeAction::Inserted
        }
    };

    history.sort_by_key(|r| r.date);

    let dropped = history.len().saturating_sub(max_entries);
    if dropped > 0 {
        history.drain(..dropped);
    }

    MergeOutcome::Merged { history, action, dropped }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
