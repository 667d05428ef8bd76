//! Permutation feature importance.
//!
//! For each column, shuffle it (seeded), re-predict, and measure how much the
//! mean squared error grows. Increases are clamped at zero and normalized so
//! the scores sum to 1.

use crate::domain::errors::PredictionError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

fn mse(actuals: &[f64], predictions: &[f64]) -> f64 {
    let n = actuals.len().max(1) as f64;
    actuals
        .iter()
        .zip(predictions.iter())
        .map(|(t, p)| (p - t).powi(2))
        .sum::<f64>()
        / n
}

/// Scores every column of `rows`, ranked from most to least important.
pub fn permutation_importance<F>(
    predict: F,
    rows: &[Vec<f64>],
    labels: &[f64],
    names: &[&'static str],
    seed: u64,
) -> Result<Vec<FeatureImportance>, PredictionError>
where
    F: Fn(&[Vec<f64>]) -> Result<Vec<f64>, PredictionError>,
{
    let n_features = names.len();
    if rows.iter().any(|row| row.len() != n_features) {
        return Err(PredictionError::shape_mismatch(
            format!("{n_features} features"),
            "rows of a different width",
        ));
    }

    let baseline = mse(labels, &predict(rows)?);

    let mut raw = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(j as u64));
        let mut column: Vec<f64> = rows.iter().map(|row| row[j]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = rows
            .iter()
            .zip(column)
            .map(|(row, value)| {
                let mut row = row.clone();
                row[j] = value;
                row
            })
            .collect();

        let increase = mse(labels, &predict(&permuted)?) - baseline;
        raw.push(if increase.is_finite() { increase.max(0.0) } else { 0.0 });
    }

    let total: f64 = raw.iter().sum();
    let mut scores: Vec<FeatureImportance> = names
        .iter()
        .zip(raw)
        .map(|(feature, value)| FeatureImportance {
            feature: *feature,
            importance: if total > 0.0 {
                value / total
            } else {
                1.0 / n_features as f64
            },
        })
        .collect();

    // Stable sort keeps column order among ties
    scores.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(scores)
}
