use crate::application::market_data::MemoizedMarketData;
use crate::application::ml::{FeatureImportance, PriceModel, PriceModelKind};
use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, PricePoint, TrainingFrame};
use crate::domain::ml::InSampleFit;
use crate::domain::ports::MarketDataProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockForecastRequest {
    pub bars: BarRequest,
    pub model: PriceModelKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockForecast {
    pub symbol: String,
    pub model: PriceModelKind,
    #[serde(skip)]
    pub history: Arc<[PricePoint]>,
    /// Close of the most recent frame row.
    pub current_price: f64,
    pub predicted_price: f64,
    /// `None` when the current price is zero.
    pub change_pct: Option<f64>,
    pub in_sample: InSampleFit,
    pub feature_importance: Option<Vec<FeatureImportance>>,
}

impl StockForecast {
    /// Up to `n` most recent bars, oldest first.
    pub fn recent_bars(&self, n: usize) -> &[PricePoint] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

/// Percentage move from `current` to `predicted`.
pub fn change_pct(current: f64, predicted: f64) -> Option<f64> {
    if current == 0.0 || !current.is_finite() {
        None
    } else {
        Some((predicted - current) / current * 100.0)
    }
}

/// Runs the next-day price pipeline: fetch (memoized) → frame → fit → predict.
#[derive(Debug)]
pub struct StockForecastService {
    market_data: MemoizedMarketData,
}

impl StockForecastService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            market_data: MemoizedMarketData::new(provider),
        }
    }

    pub fn market_data(&self) -> &MemoizedMarketData {
        &self.market_data
    }

    /// The model is refitted on every call.
    pub async fn forecast(
        &mut self,
        request: &StockForecastRequest,
    ) -> Result<StockForecast, PredictionError> {
        let history = self.market_data.fetch(&request.bars).await?;
        info!(
            "StockForecastService: {} bars for {}",
            history.len(),
            request.bars
        );

        let frame = TrainingFrame::build(&history)?;
        let model = PriceModel::fit(&frame, request.model)?;

        let predicted_price = model.predict_next_close()?;
        let current_price = frame
            .last()
            .map(|row| row.close())
            .ok_or_else(|| PredictionError::model("empty training frame"))?;
        let in_sample = model.in_sample_fit()?;
        let feature_importance = model.feature_importance()?;

        info!(
            "StockForecastService: {} current={:.2} predicted={:.2} in-sample RMSE={:.4} R²={:.4}",
            request.model, current_price, predicted_price, in_sample.rmse, in_sample.r2
        );

        Ok(StockForecast {
            symbol: request.bars.symbol.clone(),
            model: request.model,
            history,
            current_price,
            predicted_price,
            change_pct: change_pct(current_price, predicted_price),
            in_sample,
            feature_importance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_pct() {
        assert_eq!(change_pct(100.0, 110.0), Some(10.0));
        assert_eq!(change_pct(200.0, 150.0), Some(-25.0));
        assert_eq!(change_pct(0.0, 5.0), None);
    }
}
