//! Market data source configuration parsing from environment variables.

use anyhow::{Context, Result};

/// Yahoo chart API endpoint and HTTP client behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl MarketDataConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let timeout_secs = match lookup("MARKET_DATA_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("Failed to parse MARKET_DATA_TIMEOUT_SECS")?,
            None => defaults.timeout_secs,
        };
        let max_retries = match lookup("MARKET_DATA_MAX_RETRIES") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("Failed to parse MARKET_DATA_MAX_RETRIES")?,
            None => defaults.max_retries,
        };

        Ok(Self {
            base_url: lookup("MARKET_DATA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs,
            max_retries,
        })
    }
}
