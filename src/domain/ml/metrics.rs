use serde::{Deserialize, Serialize};

/// Fit-quality metrics computed on the same rows the model was fitted on.
///
/// These are optimistic by construction: they measure how well the model
/// reproduces its own training data, not how it generalizes to unseen days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InSampleFit {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub samples: usize,
}

impl InSampleFit {
    /// Calculate metrics from aligned actual/predicted series.
    ///
    /// # Arguments
    /// * `actuals` - Labels the model was fitted on
    /// * `predictions` - Model output for the same rows
    pub fn calculate(actuals: &[f64], predictions: &[f64]) -> Self {
        let n = actuals.len().min(predictions.len());
        if n == 0 {
            return Self {
                rmse: 0.0,
                mae: 0.0,
                r2: 0.0,
                samples: 0,
            };
        }

        let sq_err: f64 = predictions
            .iter()
            .zip(actuals.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let mse = sq_err / n as f64;
        let mae = predictions
            .iter()
            .zip(actuals.iter())
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / n as f64;

        let mean_y = actuals[..n].iter().sum::<f64>() / n as f64;
        let var_y = actuals[..n]
            .iter()
            .map(|t| (t - mean_y).powi(2))
            .sum::<f64>()
            / n as f64;
        // Undefined for a constant label; report no explained variance
        let r2 = if var_y > 0.0 { 1.0 - mse / var_y } else { 0.0 };

        Self {
            rmse: mse.sqrt(),
            mae,
            r2,
            samples: n,
        }
    }
}
