use crate::config::MarketDataConfig;
use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, BarTable, ColumnLabel};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::{HttpClientFactory, build_url_with_query};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

const COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Daily bars from the Yahoo Finance chart API.
pub struct YahooMarketDataProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooMarketDataProvider {
    pub fn new(config: &MarketDataConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(config),
            base_url: config.base_url.clone(),
        }
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    // Absent when the range holds no trading days
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Chart endpoint for one request. The symbol is pushed as a single encoded
/// path segment, so `/`, `?` and `#` in it cannot reshape the URL.
fn chart_url(base_url: &str, request: &BarRequest) -> Result<Url, PredictionError> {
    // period2 is exclusive; the request end date is inclusive
    let period1 = epoch_seconds(request.start).to_string();
    let period2 = epoch_seconds(request.end + Duration::days(1)).to_string();
    let mut url = build_url_with_query(
        base_url,
        &[
            ("period1", period1.as_str()),
            ("period2", period2.as_str()),
            ("interval", "1d"),
            ("events", "history"),
        ],
    )?;
    url.path_segments_mut()
        .map_err(|_| PredictionError::fetch(format!("base URL '{}' cannot take a path", base_url)))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", request.symbol.as_str()]);
    Ok(url)
}

/// Flattens a chart response into a `BarTable`, keeping only days inside the request.
///
/// Yahoo's "Not Found" error (unknown symbol) and a result without timestamps
/// both become an empty table; normalization turns that into `NoDataFound`.
fn table_from_chart(body: ChartResponse, request: &BarRequest) -> Result<BarTable, PredictionError> {
    let mut table = BarTable::new(COLUMNS.iter().map(|c| ColumnLabel::flat(c)).collect());

    if let Some(error) = body.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            warn!("Yahoo: symbol {} not found: {}", request.symbol, error.description);
            return Ok(table);
        }
        return Err(PredictionError::fetch(format!(
            "Yahoo chart error for {}: {} ({})",
            request.symbol, error.code, error.description
        )));
    }

    let Some(result) = body.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(table);
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(table);
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    // Series align with timestamps by index
    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    for (i, ts) in timestamps.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| PredictionError::fetch(format!("bad timestamp {} from Yahoo", ts)))?
            .date_naive();
        if date < request.start || date > request.end {
            continue;
        }
        table.push(
            date,
            vec![
                at(&quote.open, i),
                at(&quote.high, i),
                at(&quote.low, i),
                at(&quote.close, i),
                at(&adjclose, i),
                at(&quote.volume, i),
            ],
        );
    }

    Ok(table)
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch_daily_bars(&self, request: &BarRequest) -> Result<BarTable, PredictionError> {
        let url = chart_url(&self.base_url, request)?;

        debug!("Yahoo: GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PredictionError::fetch(format!("Yahoo request failed: {}", e)))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PredictionError::fetch(format!("Yahoo response unreadable: {}", e)))?;

        // Unknown symbols come back as 404 with a chart.error body
        let body: ChartResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(PredictionError::fetch(format!(
                    "Yahoo response malformed: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(PredictionError::fetch(format!(
                    "Yahoo returned HTTP {} for {}",
                    status, request.symbol
                )));
            }
        };

        let table = table_from_chart(body, request)?;
        info!("Yahoo: {} raw bars for {}", table.rows.len(), request);
        Ok(table)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BarRequest {
        BarRequest::new(
            "TSLA",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        )
    }

    fn parse(json: &str) -> Result<BarTable, PredictionError> {
        table_from_chart(serde_json::from_str(json).unwrap(), &request())
    }

    #[test]
    fn test_chart_to_table() {
        // 2024-01-02/03/04/05 14:30 UTC
        let table = parse(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":-18000},
                "timestamp":[1704205800,1704292200,1704378600,1704465000],
                "indicators":{
                    "quote":[{
                        "open":[250.1,244.0,null,237.5],
                        "high":[251.0,245.7,240.1,240.0],
                        "low":[244.4,236.3,234.9,234.0],
                        "close":[248.4,238.4,237.9,237.4],
                        "volume":[104654200,121082600,102629300,92488900]
                    }],
                    "adjclose":[{"adjclose":[248.4,238.4,237.9,237.4]}]
                }
            }],"error":null}}"#,
        )
        .unwrap();

        // Fourth day falls outside the inclusive range
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].date, request().start);
        assert_eq!(table.rows[1].values[3], Some(238.4));

        let points = table.normalize(&request()).unwrap();
        // Row with a missing open is dropped
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].volume, 121082600.0);
    }

    #[test]
    fn test_not_found_is_empty() {
        let table = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        assert!(table.is_empty());
        assert!(matches!(
            table.normalize(&request()),
            Err(PredictionError::NoDataFound { .. })
        ));
    }

    #[test]
    fn test_missing_timestamps_is_empty() {
        let table = parse(
            r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_other_chart_errors_are_fetch_failures() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid interval"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PredictionError::Fetch { .. }));
    }

    #[test]
    fn test_chart_url() {
        let url = chart_url("https://query1.finance.yahoo.com", &request()).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/TSLA");
        assert_eq!(
            url.query(),
            Some("period1=1704153600&period2=1704412800&interval=1d&events=history")
        );
    }

    #[test]
    fn test_symbol_stays_one_path_segment() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let request = BarRequest::new("brk/b?x=1#frag", start, start);

        let url = chart_url("http://localhost:8080/proxy/", &request).unwrap();
        assert_eq!(url.path(), "/proxy/v8/finance/chart/BRK%2FB%3FX=1%23FRAG");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query_pairs().count(), 4);

        assert!(matches!(
            chart_url("mailto:someone@example.com", &request),
            Err(PredictionError::Fetch { .. })
        ));
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(epoch_seconds(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()), 1704153600);
    }
}
