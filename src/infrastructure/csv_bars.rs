//! Daily bars from a CSV export on disk.
//!
//! Two layouts are accepted. A flat header row:
//!
//! ```text
//! Date,Open,High,Low,Close,Volume
//! ```
//!
//! and the three-row multi-level header produced by ticker-indexed exports:
//!
//! ```text
//! Price,Close,High,Low,Open,Volume
//! Ticker,TSLA,TSLA,TSLA,TSLA,TSLA
//! Date,,,,,
//! ```

use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, BarTable, ColumnLabel};
use crate::domain::ports::MarketDataProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::StringRecord;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CsvBarProvider {
    path: PathBuf,
}

impl CsvBarProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Accepts "2024-01-02" as well as "2024-01-02 00:00:00-05:00"
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_value(raw: &str, line: u64) -> Result<Option<f64>, PredictionError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| PredictionError::fetch(format!("line {}: bad value '{}': {}", line, raw, e)))
}

/// Column labels and which record fields feed them.
struct Header {
    columns: Vec<ColumnLabel>,
    fields: Vec<usize>,
    rows_to_skip: usize,
}

fn read_header(records: &[StringRecord], symbol: &str) -> Result<Header, PredictionError> {
    let first = records
        .first()
        .ok_or_else(|| PredictionError::fetch("CSV file is empty"))?;
    let ticker_row = records
        .get(1)
        .filter(|r| r.get(0).is_some_and(|c| c.trim().eq_ignore_ascii_case("ticker")));

    let Some(ticker_row) = ticker_row else {
        let columns = first.iter().skip(1).map(|c| ColumnLabel::flat(c.trim())).collect();
        let fields = (1..first.len()).collect();
        return Ok(Header {
            columns,
            fields,
            rows_to_skip: 1,
        });
    };

    // A bare "Date,,,,," row may follow the ticker row
    let date_row = records
        .get(2)
        .is_some_and(|r| parse_date(r.get(0).unwrap_or("")).is_none());

    let mut columns = Vec::new();
    let mut fields = Vec::new();
    for (i, price) in first.iter().enumerate().skip(1) {
        let ticker = ticker_row.get(i).unwrap_or("").trim();
        // Multi-ticker exports: keep only the requested symbol's columns
        if ticker.eq_ignore_ascii_case(symbol) {
            columns.push(ColumnLabel::hierarchical(&[price.trim(), ticker]));
            fields.push(i);
        }
    }

    Ok(Header {
        columns,
        fields,
        rows_to_skip: if date_row { 3 } else { 2 },
    })
}

/// Parses CSV text into a table restricted to the request's inclusive date range.
pub fn parse_bars(text: &str, request: &BarRequest) -> Result<BarTable, PredictionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PredictionError::fetch(format!("CSV read error: {}", e)))?;

    let header = read_header(&records, &request.symbol)?;
    let mut table = BarTable::new(header.columns);
    if table.columns.is_empty() {
        debug!("CsvBarProvider: no columns for {}", request.symbol);
        return Ok(table);
    }

    for (offset, record) in records.iter().enumerate().skip(header.rows_to_skip) {
        let line = offset as u64 + 1;
        let Some(date) = record.get(0).and_then(parse_date) else {
            return Err(PredictionError::fetch(format!(
                "line {}: bad date '{}'",
                line,
                record.get(0).unwrap_or("")
            )));
        };
        if date < request.start || date > request.end {
            continue;
        }
        let values = header
            .fields
            .iter()
            .map(|&i| parse_value(record.get(i).unwrap_or(""), line))
            .collect::<Result<Vec<_>, _>>()?;
        table.push(date, values);
    }

    Ok(table)
}

#[async_trait]
impl MarketDataProvider for CsvBarProvider {
    async fn fetch_daily_bars(&self, request: &BarRequest) -> Result<BarTable, PredictionError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PredictionError::fetch(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let table = parse_bars(&text, request)?;
        info!(
            "CsvBarProvider: {} raw bars for {} from {}",
            table.rows.len(),
            request,
            self.path.display()
        );
        Ok(table)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
