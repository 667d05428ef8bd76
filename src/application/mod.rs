// Pipelines exposed to the binaries
pub mod heart_service;
pub mod stock_service;

// Market data acquisition
pub mod market_data;

// Estimators, artifacts and scoring
pub mod ml;

pub use heart_service::HeartDiseaseService;
pub use stock_service::{StockForecast, StockForecastRequest, StockForecastService};
