//! Pool balance extraction from explorer markup.
//!
//! The page is unstructured HTML, so each pool is located by its own
//! regex (one `FieldPattern` per pool, configurable). A pool whose pattern
//! does not match is reported as `0.0` rather than failing the run; the
//! zero-total guard in the merger catches the case where nothing matched.
//! A pattern that matches but captures something other than a finite
//! number fails the run.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::types::{Pool, PoolSnapshot, TrackerError};

struct CompiledPattern {
    pool: Pool,
    regex: Regex,
}

/// Compiled pattern-per-field extraction strategy.
pub struct PoolExtractor {
    patterns: Vec<CompiledPattern>,
}

impl PoolExtractor {
    pub fn new(cfg: &ExtractorConfig) -> Result<Self, TrackerError> {
        let patterns = cfg
            .patterns
            .iter()
            .map(|fp| {
                let regex = RegexBuilder::new(&fp.pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|e| TrackerError::Config(format!("Invalid pattern for {} pool: {e}", fp.pool)))?;
                if regex.captures_len() < 2 {
                    return Err(TrackerError::Config(format!(
                        "Pattern for {} pool has no capture group",
                        fp.pool
                    )));
                }
                Ok(CompiledPattern { pool: fp.pool, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Extract all pool balances. Missing pools default to zero.
    pub fn extract(&self, html: &str) -> Result<PoolSnapshot, TrackerError> {
        let mut snapshot = PoolSnapshot::default();
        for pool in Pool::ALL {
            match self.extract_pool(pool, html)? {
                Some(value) => snapshot.set(pool, value),
                None => warn!(pool = pool.name(), "Pool balance not found in page, defaulting to 0"),
            }
        }
        Ok(snapshot)
    }

    /// Extract a single pool's balance.
    ///
    /// `Ok(None)` when the pattern does not match; an error when it matches
    /// but the capture is not a finite amount.
    pub fn extract_pool(&self, pool: Pool, html: &str) -> Result<Option<f64>, TrackerError> {
        let Some(raw) = self
            .patterns
            .iter()
            .find(|p| p.pool == pool)
            .and_then(|p| p.regex.captures(html))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
        else {
            return Ok(None);
        };

        match parse_amount(raw) {
            Some(value) => Ok(Some(value)),
            None => {
                debug!(pool = pool.name(), raw, "Matched pool value is not a number");
                Err(TrackerError::Extraction {
                    pool,
                    raw: raw.to_string(),
                })
            }
        }
    }
}

/// Parse a comma-grouped amount such as `1,234.56`.
/// Values that overflow to infinity are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
