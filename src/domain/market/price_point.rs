use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily OHLCV bar in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A market-data request. Also the memoization key: two requests with the
/// same symbol and inclusive date range are the same fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BarRequest {
    /// Symbols are trimmed and upper-cased so `" tsla"` and `"TSLA"` share a cache entry.
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            start,
            end,
        }
    }

    pub fn is_empty_range(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for BarRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} .. {}]", self.symbol, self.start, self.end)
    }
}
