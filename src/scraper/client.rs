//! HTTP client for upstream pages.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::ScraperConfig;

/// Shared HTTP client with explicit deadlines and a bounded idle pool.
///
/// One client is built at startup and reused by every request; each
/// extractor invocation performs exactly one fetch through it.
#[derive(Clone)]
pub struct PageClient {
    http: reqwest::Client,
}

impl PageClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections)
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }

    /// Fetch a page and return its body as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} returned an error status", url))?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}
