use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, BarTable, ColumnLabel};
use crate::domain::ports::{ArtifactName, ArtifactStore, MarketDataProvider};
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Clone)]
enum MockBehavior {
    /// `n` synthetic daily bars starting at the request's start date.
    DailyBars { symbol: String, count: usize },
    /// A prepared table handed back as-is.
    Table(BarTable),
    Failing(String),
}

/// Deterministic in-process market data source.
#[derive(Debug)]
pub struct MockMarketDataProvider {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockMarketDataProvider {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_daily_bars(symbol: &str, count: usize) -> Self {
        Self::with_behavior(MockBehavior::DailyBars {
            symbol: symbol.trim().to_uppercase(),
            count,
        })
    }

    pub fn with_table(table: BarTable) -> Self {
        Self::with_behavior(MockBehavior::Table(table))
    }

    pub fn empty() -> Self {
        Self::with_table(BarTable::default())
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_behavior(MockBehavior::Failing(reason.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Gently trending OHLCV series with some intraday texture, one bar per day
/// from the request start, never past the inclusive end.
fn synthetic_table(request: &BarRequest, count: usize) -> BarTable {
    let days_in_range = usize::try_from((request.end - request.start).num_days() + 1).unwrap_or(0);
    let count = count.min(days_in_range);
    let mut table = BarTable::new(
        ["Open", "High", "Low", "Close", "Volume"]
            .iter()
            .map(|name| ColumnLabel::flat(name))
            .collect(),
    );
    for i in 0..count {
        let t = i as f64;
        let close = 200.0 + 1.5 * t + (t * 0.9).sin() * 2.0;
        table.push(
            request.start + Duration::days(i as i64),
            vec![
                Some(close - 0.8 + ((i * 5) % 4) as f64 * 0.15),
                Some(close + 1.2 + (i % 3) as f64 * 0.3),
                Some(close - 1.4 - (i % 2) as f64 * 0.2),
                Some(close),
                Some(5_000_000.0 + 100_000.0 * ((i * 3) % 7) as f64),
            ],
        );
    }
    table
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn fetch_daily_bars(&self, request: &BarRequest) -> Result<BarTable, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockMarketDataProvider: fetch {}", request);

        match &self.behavior {
            MockBehavior::DailyBars { symbol, count } if *symbol == request.symbol => {
                Ok(synthetic_table(request, *count))
            }
            MockBehavior::DailyBars { .. } => Ok(BarTable::default()),
            MockBehavior::Table(table) => Ok(table.clone()),
            MockBehavior::Failing(reason) => Err(PredictionError::fetch(reason.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Artifact store backed by a map, for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    artifacts: Mutex<HashMap<ArtifactName, Vec<u8>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&self, name: ArtifactName) {
        if let Ok(mut artifacts) = self.artifacts.lock() {
            artifacts.remove(&name);
        }
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn read(&self, name: ArtifactName) -> Result<Vec<u8>, PredictionError> {
        let artifacts = self.artifacts.lock().map_err(|e| PredictionError::ModelLoad {
            artifact: name.file_name().to_string(),
            reason: e.to_string(),
        })?;
        artifacts
            .get(&name)
            .cloned()
            .ok_or_else(|| PredictionError::ModelLoad {
                artifact: name.file_name().to_string(),
                reason: "artifact not found".to_string(),
            })
    }

    fn write(&self, name: ArtifactName, bytes: &[u8]) -> Result<(), PredictionError> {
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|e| PredictionError::model(format!("artifact store poisoned: {}", e)))?;
        artifacts.insert(name, bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_mock_bars_start_at_request() {
        let provider = MockMarketDataProvider::with_daily_bars("tsla", 3);
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let request = BarRequest::new("TSLA", start, start + Duration::days(30));

        let table = provider.fetch_daily_bars(&request).await.unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].date, start);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_bars_stay_inside_the_range() {
        let provider = MockMarketDataProvider::with_daily_bars("TSLA", 10);
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = start + Duration::days(3);

        let table = provider
            .fetch_daily_bars(&BarRequest::new("TSLA", start, end))
            .await
            .unwrap();
        assert_eq!(table.rows.len(), 4);
        assert!(table.rows.iter().all(|row| row.date >= start && row.date <= end));

        let inverted = provider
            .fetch_daily_bars(&BarRequest::new("TSLA", end, start))
            .await
            .unwrap();
        assert!(inverted.rows.is_empty());
    }

    #[test]
    fn test_in_memory_store_roundtrip() {
        let store = InMemoryArtifactStore::new();
        assert!(matches!(
            store.read(ArtifactName::Scaler),
            Err(PredictionError::ModelLoad { .. })
        ));

        store.write(ArtifactName::Scaler, b"{}").unwrap();
        assert_eq!(store.read(ArtifactName::Scaler).unwrap(), b"{}".to_vec());

        store.remove(ArtifactName::Scaler);
        assert!(store.read(ArtifactName::Scaler).is_err());
    }
}
