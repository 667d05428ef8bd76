//! Configuration module for Prognos.
//!
//! Structured configuration loaded from environment variables (a `.env` file
//! is honored by the binaries), organized by concern: model artifacts and
//! market data.

mod market_data_config;
mod model_config;

pub use market_data_config::MarketDataConfig;
pub use model_config::{MAX_LOOKBACK_DAYS, ModelConfig};

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub model: ModelConfig,
    pub market_data: MarketDataConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading keys through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model = ModelConfig::from_lookup(&lookup).context("Failed to load model config")?;
        let market_data =
            MarketDataConfig::from_lookup(&lookup).context("Failed to load market data config")?;
        Ok(Self { model, market_data })
    }
}
