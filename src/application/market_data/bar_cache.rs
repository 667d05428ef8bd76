use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, PricePoint};
use crate::domain::ports::MarketDataProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Normalized bars memoized by (symbol, start, end).
///
/// Owned by the caller and mutated through `&mut self`. Entries are never
/// invalidated; failed fetches are never stored.
pub struct MemoizedMarketData {
    provider: Arc<dyn MarketDataProvider>,
    bars: HashMap<BarRequest, Arc<[PricePoint]>>,
    hits: u64,
    misses: u64,
}

// Manual Debug implementation: the provider is a trait object
impl std::fmt::Debug for MemoizedMarketData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizedMarketData")
            .field("provider", &self.provider.name())
            .field("entries", &self.bars.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

impl MemoizedMarketData {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            bars: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Canonical bars for the request, fetched at most once per key.
    pub async fn fetch(&mut self, request: &BarRequest) -> Result<Arc<[PricePoint]>, PredictionError> {
        if let Some(bars) = self.bars.get(request) {
            self.hits += 1;
            trace!("MemoizedMarketData: Cache HIT for {}", request);
            return Ok(Arc::clone(bars));
        }

        // An inverted range cannot contain a trading day
        if request.is_empty_range() {
            return Err(PredictionError::NoDataFound {
                symbol: request.symbol.clone(),
                start: request.start,
                end: request.end,
            });
        }

        self.misses += 1;
        debug!(
            "MemoizedMarketData: Cache MISS for {}. Fetching from {}...",
            request,
            self.provider.name()
        );
        let table = self.provider.fetch_daily_bars(request).await?;
        let points: Arc<[PricePoint]> = table.normalize(request)?.into();

        self.bars.insert(request.clone(), Arc::clone(&points));
        Ok(points)
    }

    pub fn get(&self, request: &BarRequest) -> Option<Arc<[PricePoint]>> {
        self.bars.get(request).cloned()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockMarketDataProvider;
    use chrono::NaiveDate;

    fn request(symbol: &str) -> BarRequest {
        BarRequest::new(
            symbol,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 10));
        let mut cache = MemoizedMarketData::new(provider.clone());

        let first = cache.fetch(&request("TSLA")).await.unwrap();
        let second = cache.fetch(&request("tsla")).await.unwrap();

        assert_eq!(first.len(), 10);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let provider = Arc::new(MockMarketDataProvider::failing("upstream unavailable"));
        let mut cache = MemoizedMarketData::new(provider.clone());

        for _ in 0..2 {
            let err = cache.fetch(&request("TSLA")).await.unwrap_err();
            assert!(matches!(err, PredictionError::Fetch { .. }));
        }
        assert_eq!(provider.call_count(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_empty_response_is_no_data() {
        let provider = Arc::new(MockMarketDataProvider::empty());
        let mut cache = MemoizedMarketData::new(provider);

        let err = cache.fetch(&request("ZZZZ")).await.unwrap_err();
        assert!(matches!(err, PredictionError::NoDataFound { .. }));
        assert!(cache.get(&request("ZZZZ")).is_none());
    }

    #[tokio::test]
    async fn test_inverted_range_skips_provider() {
        let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 10));
        let mut cache = MemoizedMarketData::new(provider.clone());
        let inverted = BarRequest::new(
            "TSLA",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        let err = cache.fetch(&inverted).await.unwrap_err();
        assert!(matches!(err, PredictionError::NoDataFound { .. }));
        assert_eq!(provider.call_count(), 0);
    }
}
