//! Model artifact and forecast default configuration.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use std::path::PathBuf;

/// Upper bound on `DEFAULT_LOOKBACK_DAYS` (about a century of daily bars).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Directory holding `scaler.json` and `model.json`.
    pub models_dir: PathBuf,
    pub default_ticker: String,
    pub default_lookback_days: i64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            default_ticker: "TSLA".to_string(),
            default_lookback_days: 365,
        }
    }
}

impl ModelConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let default_lookback_days = match lookup("DEFAULT_LOOKBACK_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .context("Failed to parse DEFAULT_LOOKBACK_DAYS")?,
            None => defaults.default_lookback_days,
        };
        if !(1..=MAX_LOOKBACK_DAYS).contains(&default_lookback_days) {
            anyhow::bail!(
                "DEFAULT_LOOKBACK_DAYS must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS,
                default_lookback_days
            );
        }

        Ok(Self {
            models_dir: lookup("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            default_ticker: lookup("DEFAULT_TICKER")
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .unwrap_or(defaults.default_ticker),
            default_lookback_days,
        })
    }

    /// Start of the default window ending at `end`.
    pub fn default_start(&self, end: NaiveDate) -> Result<NaiveDate> {
        let days = u64::try_from(self.default_lookback_days)
            .context("DEFAULT_LOOKBACK_DAYS must be positive")?;
        end.checked_sub_days(Days::new(days)).with_context(|| {
            format!(
                "{} days before {} is outside the supported date range",
                days, end
            )
        })
    }
}
