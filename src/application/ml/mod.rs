// Estimators: risk classifier, price regressor, importance, training
pub mod feature_importance;
pub mod predictor;
pub mod price_model;
pub mod risk_model;
pub mod smartcore_predictor;
pub mod training;

pub use feature_importance::FeatureImportance;
pub use predictor::RiskClassifier;
pub use price_model::{PriceModel, PriceModelKind};
pub use risk_model::RiskModel;
pub use smartcore_predictor::SmartCoreRiskClassifier;
