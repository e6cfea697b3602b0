//! Shared types for the shielded pool tracker.
//!
//! The data model is small: a per-run `PoolSnapshot`, the persisted
//! `DailyRecord`, and the outcome/error types every stage returns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// A shielded value pool, one per protocol generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Sprout,
    Sapling,
    Orchard,
}

impl Pool {
    /// All pools, oldest generation first.
    pub const ALL: [Pool; 3] = [Pool::Sprout, Pool::Sapling, Pool::Orchard];

    /// Stable lowercase key, as used in the history file.
    pub fn name(&self) -> &'static str {
        match self {
            Pool::Sprout => "sprout",
            Pool::Sapling => "sapling",
            Pool::Orchard => "orchard",
        }
    }

    /// Label the explorer page prints in front of the pool balance.
    pub fn label(&self) -> &'static str {
        match self {
            Pool::Sprout => "Sprout",
            Pool::Sapling => "Sapling",
            Pool::Orchard => "Orchard",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Pool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sprout" => Ok(Pool::Sprout),
            "sapling" => Ok(Pool::Sapling),
            "orchard" => Ok(Pool::Orchard),
            other => Err(format!("Unknown pool: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Balances of all three pools at one observation instant, in ZEC.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub sprout: f64,
    pub sapling: f64,
    pub orchard: f64,
}

impl PoolSnapshot {
    pub fn new(sprout: f64, sapling: f64, orchard: f64) -> Self {
        Self { sprout, sapling, orchard }
    }

    pub fn get(&self, pool: Pool) -> f64 {
        match pool {
            Pool::Sprout => self.sprout,
            Pool::Sapling => self.sapling,
            Pool::Orchard => self.orchard,
        }
    }

    pub fn set(&mut self, pool: Pool, value: f64) {
        match pool {
            Pool::Sprout => self.sprout = value,
            Pool::Sapling => self.sapling = value,
            Pool::Orchard => self.orchard = value,
        }
    }

    /// Sum of all three pools.
    pub fn total(&self) -> f64 {
        self.sprout + self.sapling + self.orchard
    }

    /// A zero total only happens when no pool could be extracted.
    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }
}

impl fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sprout={:.2} sapling={:.2} orchard={:.2} total={:.2}",
            self.sprout,
            self.sapling,
            self.orchard,
            self.total(),
        )
    }
}

// ---------------------------------------------------------------------------
// Daily record
// ---------------------------------------------------------------------------

/// One history entry. At most one exists per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// UTC calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Instant of the observation that produced this record.
    pub timestamp: DateTime<Utc>,
    pub sprout: f64,
    pub sapling: f64,
    pub orchard: f64,
    pub total: f64,
}

impl DailyRecord {
    pub fn from_snapshot(date: NaiveDate, timestamp: DateTime<Utc>, snapshot: &PoolSnapshot) -> Self {
        Self {
            date,
            timestamp,
            sprout: snapshot.sprout,
            sapling: snapshot.sapling,
            orchard: snapshot.orchard,
            total: snapshot.total(),
        }
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot::new(self.sprout, self.sapling, self.orchard)
    }
}

impl fmt::Display for DailyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.date, self.snapshot())
    }
}

// ---------------------------------------------------------------------------
// Run outcomes
// ---------------------------------------------------------------------------

/// Whether today's record replaced an existing one or was appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Inserted,
    Updated,
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeAction::Inserted => write!(f, "inserted"),
            MergeAction::Updated => write!(f, "updated"),
        }
    }
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// History was merged and written back.
    Saved { action: MergeAction, date: NaiveDate, entries: usize },
    /// Extraction produced a zero total; nothing was written.
    Skipped,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a run. Each one maps to a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Transport error ({url}): {message}")]
    Transport {
        url: String,
        message: String,
        status: Option<u16>,
    },

    #[error("Unparsable {pool} pool value: {raw:?}")]
    Extraction { pool: Pool, raw: String },

    #[error("Corrupt history file {path}: {message}")]
    CorruptHistory { path: String, message: String },

    #[error("Storage error ({path}): {message}")]
    Storage { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
