//! Provider-shaped bar tables and their normalization to [`PricePoint`].
//!
//! Providers hand back columns either flat (`"Close"`) or as a multi-level
//! label (`("Close", "TSLA")`). Normalization keeps the first level of each
//! label, lower-cases it and looks up the five canonical OHLCV columns. No
//! business logic sees a `BarTable`.

use super::price_point::{BarRequest, PricePoint};
use crate::domain::errors::PredictionError;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnLabel {
    Flat(String),
    Hierarchical(Vec<String>),
}

impl ColumnLabel {
    pub fn flat(name: &str) -> Self {
        ColumnLabel::Flat(name.to_string())
    }

    pub fn hierarchical(levels: &[&str]) -> Self {
        ColumnLabel::Hierarchical(levels.iter().map(|s| s.to_string()).collect())
    }

    /// Lower-cased first level, e.g. `("Close", "TSLA")` → `"close"`.
    pub fn canonical(&self) -> String {
        let head = match self {
            ColumnLabel::Flat(name) => name.as_str(),
            ColumnLabel::Hierarchical(levels) => levels.first().map(String::as_str).unwrap_or(""),
        };
        head.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarTable {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<RawBar>,
}

const CANONICAL_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

impl BarTable {
    pub fn new(columns: Vec<ColumnLabel>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, values: Vec<Option<f64>>) {
        self.rows.push(RawBar { date, values });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maps the table onto canonical price points, in chronological order.
    ///
    /// An empty table, or one whose every row is incomplete, is `NoDataFound`.
    /// A table missing one of the OHLCV columns is a provider fault (`Fetch`).
    pub fn normalize(&self, request: &BarRequest) -> Result<Vec<PricePoint>, PredictionError> {
        if self.rows.is_empty() {
            return Err(no_data(request));
        }

        let canonical: Vec<String> = self.columns.iter().map(ColumnLabel::canonical).collect();
        let mut index = [0usize; 5];
        for (slot, wanted) in index.iter_mut().zip(CANONICAL_COLUMNS) {
            // First match wins when a multi-ticker table repeats a field
            *slot = canonical
                .iter()
                .position(|name| name == wanted)
                .ok_or_else(|| {
                    PredictionError::fetch(format!(
                        "response for {} has no '{}' column (columns: {})",
                        request.symbol,
                        wanted,
                        canonical.join(", ")
                    ))
                })?;
        }

        let mut points: Vec<PricePoint> = self
            .rows
            .iter()
            .filter_map(|row| {
                let value = |i: usize| row.values.get(index[i]).copied().flatten();
                Some(PricePoint {
                    date: row.date,
                    open: value(0)?,
                    high: value(1)?,
                    low: value(2)?,
                    close: value(3)?,
                    volume: value(4)?,
                })
            })
            .collect();

        let dropped = self.rows.len() - points.len();
        if dropped > 0 {
            debug!(
                "BarTable: dropped {} incomplete rows for {}",
                dropped, request.symbol
            );
        }
        if points.is_empty() {
            return Err(no_data(request));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn no_data(request: &BarRequest) -> PredictionError {
    PredictionError::NoDataFound {
        symbol: request.symbol.clone(),
        start: request.start,
        end: request.end,
    }
}
