pub mod heart_view_model;
pub mod stock_view_model;

pub use heart_view_model::HeartViewModel;
pub use stock_view_model::StockViewModel;
