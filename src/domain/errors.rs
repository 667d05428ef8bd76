use thiserror::Error;

/// Every failure a prediction pipeline can surface to the user action.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Unrecognized value '{value}' for {field}")]
    InvalidCategory { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    InvalidField {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Failed to load model artifact '{artifact}': {reason}")]
    ModelLoad { artifact: String, reason: String },

    #[error("Feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("No data found for {symbol} between {start} and {end}")]
    NoDataFound {
        symbol: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Market data fetch failed: {reason}")]
    Fetch { reason: String },

    #[error("Insufficient data: need at least {required} price points, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Model error: {reason}")]
    Model { reason: String },
}

impl PredictionError {
    pub fn fetch(reason: impl Into<String>) -> Self {
        PredictionError::Fetch {
            reason: reason.into(),
        }
    }

    pub fn model(reason: impl std::fmt::Display) -> Self {
        PredictionError::Model {
            reason: reason.to_string(),
        }
    }

    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        PredictionError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
