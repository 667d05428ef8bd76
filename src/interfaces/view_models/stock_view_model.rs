use crate::application::stock_service::StockForecast;

pub struct ForecastMetrics {
    pub current: String,
    pub predicted: String,
    pub change: String,
    pub arrow: &'static str,
}

pub struct StockViewModel;

impl StockViewModel {
    pub fn metrics(forecast: &StockForecast) -> ForecastMetrics {
        let (change, arrow) = match forecast.change_pct {
            Some(pct) if pct > 0.0 => (format!("+{:.2}%", pct), "▲"),
            Some(pct) if pct < 0.0 => (format!("{:.2}%", pct), "▼"),
            Some(pct) => (format!("{:.2}%", pct), "="),
            None => ("n/a".to_string(), " "),
        };
        ForecastMetrics {
            current: format!("${:.2}", forecast.current_price),
            predicted: format!("${:.2}", forecast.predicted_price),
            change,
            arrow,
        }
    }
}
