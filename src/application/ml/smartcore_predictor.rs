use super::predictor::RiskClassifier;
use crate::domain::errors::PredictionError;
use crate::domain::health::RiskLabel;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use tracing::debug;

type Logistic = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Logistic-regression risk classifier backed by smartcore.
///
/// Serialized as-is into the `model.json` artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct SmartCoreRiskClassifier {
    n_features: usize,
    model: Logistic,
}

impl SmartCoreRiskClassifier {
    /// Fits on already-scaled rows. Labels are 0 (healthy) / 1 (disease).
    pub fn fit(rows: &[Vec<f64>], labels: &[i32]) -> Result<Self, PredictionError> {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(PredictionError::model(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }

        let x = DenseMatrix::from_2d_vec(&rows.to_vec())
            .map_err(|e| PredictionError::model(format!("Matrix creation failed: {}", e)))?;
        let y = labels.to_vec();
        let model = LogisticRegression::fit(&x, &y, LogisticRegressionParameters::default())
            .map_err(|e| PredictionError::model(format!("Training error: {}", e)))?;

        debug!(
            "SmartCoreRiskClassifier: fitted on {} rows x {} features",
            rows.len(),
            n_features
        );
        Ok(Self { n_features, model })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, PredictionError> {
        serde_json::from_slice(bytes).map_err(|e| PredictionError::ModelLoad {
            artifact: "model.json".to_string(),
            reason: format!("Failed to deserialize classifier: {}", e),
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>, PredictionError> {
        serde_json::to_vec(self).map_err(PredictionError::model)
    }

    /// Intercept plus the weighted sum of the row.
    fn decision_value(&self, scaled: &[f64]) -> Result<f64, PredictionError> {
        self.check_width(scaled)?;
        let coefficients = self.model.coefficients();
        let (rows, cols) = coefficients.shape();
        // Binary models hold a single weight vector; accept either orientation
        let weight = |j: usize| -> Result<f64, PredictionError> {
            match (rows, cols) {
                (1, n) if n == self.n_features => Ok(*coefficients.get((0, j))),
                (n, 1) if n == self.n_features => Ok(*coefficients.get((j, 0))),
                _ => Err(PredictionError::shape_mismatch(
                    format!("1x{} coefficient matrix", self.n_features),
                    format!("{}x{}", rows, cols),
                )),
            }
        };

        let mut z = *self.model.intercept().get((0, 0));
        for (j, x) in scaled.iter().enumerate() {
            z += weight(j)? * x;
        }
        Ok(z)
    }

    fn check_width(&self, scaled: &[f64]) -> Result<(), PredictionError> {
        if scaled.len() != self.n_features {
            return Err(PredictionError::shape_mismatch(
                format!("{} features", self.n_features),
                format!("{} features", scaled.len()),
            ));
        }
        Ok(())
    }
}

impl RiskClassifier for SmartCoreRiskClassifier {
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, PredictionError> {
        let z = self.decision_value(scaled)?;
        let p = 1.0 / (1.0 + (-z).exp());
        if !p.is_finite() {
            return Err(PredictionError::model("non-finite probability"));
        }
        Ok(p.clamp(0.0, 1.0))
    }

    fn predict(&self, scaled: &[f64]) -> Result<RiskLabel, PredictionError> {
        self.check_width(scaled)?;
        let input_matrix = DenseMatrix::from_2d_vec(&vec![scaled.to_vec()])
            .map_err(|e| PredictionError::model(format!("Matrix creation failed: {}", e)))?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| PredictionError::model(format!("Prediction failed: {}", e)))?;
        predictions
            .first()
            .map(|class| RiskLabel::from_class(*class))
            .ok_or_else(|| PredictionError::model("No prediction returned"))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "SmartCore Logistic Regression"
    }
}
