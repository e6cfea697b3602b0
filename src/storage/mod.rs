//! Persistence layer.
//!
//! The history is a single pretty-printed JSON array of `DailyRecord`s.
//! It is read whole at the start of a run and rewritten whole at the end.
//! Writes land in a sibling `.tmp` file first and are renamed into place.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{DailyRecord, TrackerError};

/// Load the history from `path`.
/// Returns an empty history if the file doesn't exist (first run).
pub fn load_history(path: &str) -> Result<Vec<DailyRecord>, TrackerError> {
    if !Path::new(path).exists() {
        info!(path, "No history file found, starting fresh");
        return Ok(Vec::new());
    }

    let json = fs::read_to_string(path).map_err(|e| TrackerError::CorruptHistory {
        path: path.to_string(),
        message: format!("Failed to read: {e}"),
    })?;

    let history: Vec<DailyRecord> =
        serde_json::from_str(&json).map_err(|e| TrackerError::CorruptHistory {
            path: path.to_string(),
            message: format!("Failed to parse: {e}"),
        })?;

    info!(path, entries = history.len(), "History loaded from disk");
    Ok(history)
}

/// Save the full history to `path`, replacing any previous content.
pub fn save_history(history: &[DailyRecord], path: &str) -> Result<(), TrackerError> {
    let storage_err = |message: String| TrackerError::Storage {
        path: path.to_string(),
        message,
    };

    let json = serde_json::to_string_pretty(history)
        .map_err(|e| storage_err(format!("Failed to serialise history: {e}")))?;

    let target = Path::new(path);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| storage_err(format!("Failed to create {}: {e}", parent.display())))?;
    }

    let tmp_path = PathBuf::from(format!("{path}.tmp"));
    fs::write(&tmp_path, json.as_bytes())
        .map_err(|e| storage_err(format!("Failed to write {}: {e}", tmp_path.display())))?;
    fs::rename(&tmp_path, target)
        .map_err(|e| storage_err(format!("Failed to replace history file: {e}")))?;

    debug!(path, entries = history.len(), "History saved");
    Ok(())
}

/// Delete the history file (for testing or reset).
pub fn delete_history(path: &str) -> Result<(), TrackerError> {
    if Path::new(path).exists() {
        fs::remove_file(path).map_err(|e| TrackerError::Storage {
            path: path.to_string(),
            message: format!("Failed to delete history file: {e}"),
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
