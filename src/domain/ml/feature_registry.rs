use crate::domain::errors::PredictionError;
use crate::domain::market::PricePoint;

/// Ordered list of patient feature names.
/// This order MUST match exactly the column order the scaler and classifier were fitted on.
/// Any change here is a breaking change for persisted models.
pub const HEART_FEATURE_NAMES: &[&str] = &[
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Ordered list of price model inputs.
pub const PRICE_FEATURE_NAMES: &[&str] = &["open", "high", "low", "close", "volume"];

pub const PRICE_FEATURE_COUNT: usize = 5;

/// Converts a bar into the price model's input vector.
pub fn price_features(point: &PricePoint) -> [f64; PRICE_FEATURE_COUNT] {
    [point.open, point.high, point.low, point.close, point.volume]
}

/// Checks a fitted artifact's feature names against the expected order.
pub fn ensure_feature_order(expected: &[&str], actual: &[String]) -> Result<(), PredictionError> {
    let matches = expected.len() == actual.len()
        && expected.iter().zip(actual.iter()).all(|(e, a)| *e == a.as_str());
    if matches {
        Ok(())
    } else {
        Err(PredictionError::shape_mismatch(
            expected.join(","),
            actual.join(","),
        ))
    }
}
