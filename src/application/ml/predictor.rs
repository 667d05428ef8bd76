use crate::domain::errors::PredictionError;
use crate::domain::health::RiskLabel;

/// Interface for the binary heart-disease classifier.
/// Inputs are rows that have already been through the fitted scaler.
pub trait RiskClassifier: Send + Sync {
    /// Probability of the positive (disease) class, in [0, 1].
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, PredictionError>;

    /// Hard verdict from the estimator.
    fn predict(&self, scaled: &[f64]) -> Result<RiskLabel, PredictionError> {
        let p = self.predict_proba(scaled)?;
        Ok(if p >= 0.5 {
            RiskLabel::Disease
        } else {
            RiskLabel::Healthy
        })
    }

    /// Number of columns the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;
}
