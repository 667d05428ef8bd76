use chrono::NaiveDate;
use prognos::application::ml::PriceModelKind;
use prognos::application::{StockForecastRequest, StockForecastService};
use prognos::domain::errors::PredictionError;
use prognos::domain::market::{BarRequest, BarTable, ColumnLabel};
use prognos::infrastructure::MockMarketDataProvider;
use std::sync::Arc;

fn request(symbol: &str, model: PriceModelKind) -> StockForecastRequest {
    StockForecastRequest {
        bars: BarRequest::new(
            symbol,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        ),
        model,
    }
}

#[tokio::test]
async fn test_ten_days_linear_regression() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 10));
    let mut service = StockForecastService::new(provider);

    let forecast = service
        .forecast(&request("TSLA", PriceModelKind::LinearRegression))
        .await
        .unwrap();

    assert!(forecast.predicted_price.is_finite());
    assert!(forecast.in_sample.rmse >= 0.0);
    assert!(forecast.in_sample.r2 <= 1.0 + 1e-9);
    assert_eq!(forecast.in_sample.samples, 9);
    assert!(forecast.feature_importance.is_none());

    // Current price is the close of the last frame row, i.e. the second-to-last bar
    assert_eq!(forecast.history.len(), 10);
    assert_eq!(forecast.current_price, forecast.history[8].close);

    let expected =
        (forecast.predicted_price - forecast.current_price) / forecast.current_price * 100.0;
    assert!((forecast.change_pct.unwrap() - expected).abs() < 1e-9);
    assert_eq!(forecast.recent_bars(5).len(), 5);
    assert_eq!(forecast.recent_bars(5)[4].date, forecast.history[9].date);
}

#[tokio::test]
async fn test_random_forest_reports_importance() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 30));
    let mut service = StockForecastService::new(provider);

    let forecast = service
        .forecast(&request("TSLA", PriceModelKind::RandomForest))
        .await
        .unwrap();

    assert!(forecast.predicted_price.is_finite());
    let importance = forecast.feature_importance.expect("forest has importance");
    assert_eq!(importance.len(), 5);
    let total: f64 = importance.iter().map(|f| f.importance).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(
        importance
            .windows(2)
            .all(|w| w[0].importance >= w[1].importance)
    );
}

#[tokio::test]
async fn test_switching_models_reuses_fetched_bars() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 20));
    let mut service = StockForecastService::new(provider.clone());

    service
        .forecast(&request("TSLA", PriceModelKind::LinearRegression))
        .await
        .unwrap();
    service
        .forecast(&request("tsla", PriceModelKind::RandomForest))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(service.market_data().stats(), (1, 1));
}

#[tokio::test]
async fn test_single_bar_is_insufficient() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 1));
    let mut service = StockForecastService::new(provider);

    let err = service
        .forecast(&request("TSLA", PriceModelKind::LinearRegression))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PredictionError::InsufficientData {
            required: 2,
            available: 1
        }
    ));
}

#[tokio::test]
async fn test_short_history_linear_regression_is_insufficient() {
    for count in 2..=6 {
        let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", count));
        let mut service = StockForecastService::new(provider);

        let err = service
            .forecast(&request("TSLA", PriceModelKind::LinearRegression))
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                PredictionError::InsufficientData { required: 7, available } if available == count
            ),
            "{} bars: {:?}",
            count,
            err
        );
    }
}

#[tokio::test]
async fn test_two_bars_random_forest() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 2));
    let mut service = StockForecastService::new(provider);

    let forecast = service
        .forecast(&request("TSLA", PriceModelKind::RandomForest))
        .await
        .unwrap();
    assert_eq!(forecast.in_sample.samples, 1);
    assert!(forecast.predicted_price.is_finite());
    assert_eq!(forecast.current_price, forecast.history[0].close);
}

#[tokio::test]
async fn test_unknown_ticker_is_no_data() {
    let provider = Arc::new(MockMarketDataProvider::with_daily_bars("TSLA", 10));
    let mut service = StockForecastService::new(provider);

    let err = service
        .forecast(&request("NOPE", PriceModelKind::LinearRegression))
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::NoDataFound { ref symbol, .. } if symbol == "NOPE"));
}

#[tokio::test]
async fn test_hierarchical_columns_feed_the_same_pipeline() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut table = BarTable::new(
        ["Close", "High", "Low", "Open", "Volume"]
            .iter()
            .map(|field| ColumnLabel::hierarchical(&[*field, "TSLA"]))
            .collect(),
    );
    for i in 0..12 {
        let close = 180.0 + i as f64 * 0.75 + ((i * 7) % 5) as f64 * 0.4;
        table.push(
            start + chrono::Duration::days(i),
            vec![
                Some(close),
                Some(close + 1.5 + (i % 3) as f64 * 0.2),
                Some(close - 1.1 - (i % 2) as f64 * 0.3),
                Some(close - 0.4 + ((i * 3) % 4) as f64 * 0.1),
                Some(3_000_000.0 + 50_000.0 * ((i * 5) % 6) as f64),
            ],
        );
    }
    let provider = Arc::new(MockMarketDataProvider::with_table(table));
    let mut service = StockForecastService::new(provider);

    let forecast = service
        .forecast(&request("TSLA", PriceModelKind::LinearRegression))
        .await
        .unwrap();
    assert_eq!(forecast.history.len(), 12);
    assert_eq!(forecast.history[0].close, 180.0);
    assert!(forecast.predicted_price.is_finite());
}
