//! Block explorer page source.
//!
//! Fetches the explorer's blockchain-info page, which lists the shielded
//! pool balances as plain HTML. There is no JSON API for these figures.
//!
//! Page: `https://mainnet.zcashexplorer.app/blockchain-info`
//! Auth: None required.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::PageSource;
use crate::config::SourceConfig;
use crate::types::TrackerError;

pub struct ExplorerClient {
    http: Client,
    url: String,
}

impl ExplorerClient {
    pub fn new(cfg: &SourceConfig) -> Result<Self, TrackerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .default_headers(Self::build_headers(cfg)?)
            .build()
            .map_err(|e| TrackerError::Config(format!("Failed to build explorer HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: cfg.url.clone(),
        })
    }

    fn build_headers(cfg: &SourceConfig) -> Result<HeaderMap, TrackerError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &cfg.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TrackerError::Config(format!("Invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TrackerError::Config(format!("Invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn transport_error(&self, message: String, status: Option<u16>) -> TrackerError {
        TrackerError::Transport {
            url: self.url.clone(),
            message,
            status,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for ExplorerClient {
    async fn fetch_page(&self) -> Result<String, TrackerError> {
        debug!(url = %self.url, "Requesting explorer page");

        let resp = self.http.get(&self.url).send().await
            .map_err(|e| self.transport_error(format!("Request failed: {e}"), e.status().map(|s| s.as_u16())))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.transport_error(format!("HTTP {status}"), Some(status.as_u16())));
        }

        let body = resp.text().await
            .map_err(|e| self.transport_error(format!("Failed to read response body: {e}"), Some(status.as_u16())))?;

        debug!(bytes = body.len(), "Explorer page received");
        Ok(body)
    }

    fn name(&self) -> &str {
        "zcashexplorer"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
