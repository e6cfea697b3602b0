//! Configuration loading from TOML.
//!
//! Every setting has a built-in default, so the tracker runs with no
//! config file at all. When `tracker.toml` exists in the working directory
//! it is deserialized over those defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::types::Pool;

/// Default config file looked up by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

const EXPLORER_URL: &str = "https://mainnet.zcashexplorer.app/blockchain-info";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; ZcashTracker/1.0)";
const DATA_FILE: &str = "shielded_data.json";
/// One year of daily records.
const MAX_ENTRIES: usize = 365;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Extra request headers beyond `User-Agent`.
    pub headers: HashMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: EXPLORER_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 30,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: String,
    pub max_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: DATA_FILE.to_string(),
            max_entries: MAX_ENTRIES,
        }
    }
}

/// One regex per pool. The first capture group must hold the amount.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FieldPattern {
    pub pool: Pool,
    pub pattern: String,
}

impl FieldPattern {
    /// Label, then the first `<dd>` value suffixed with `ZEC`.
    pub fn default_for(pool: Pool) -> Self {
        Self {
            pool,
            pattern: format!(
                r"{}\s+Pool.*?<dd[^>]*>\s*([\d,]+\.?\d*)\s*ZEC",
                pool.label()
            ),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractorConfig {
    pub patterns: Vec<FieldPattern>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            patterns: Pool::ALL.iter().map(|p| FieldPattern::default_for(*p)).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
