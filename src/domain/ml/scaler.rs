//! Feature scalers.
//!
//! `StandardScaler` is the persisted scaler in front of the risk classifier.
//! `MinMaxScaler` is fitted per request on the price frame.

use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::ensure_feature_order;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Zero-mean, unit-variance scaling (population standard deviation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(feature_names: &[&str], rows: &[Vec<f64>]) -> Result<Self, PredictionError> {
        let n_features = feature_names.len();
        check_rows(n_features, rows)?;

        let mut mean = Vec::with_capacity(n_features);
        let mut scale = Vec::with_capacity(n_features);
        for j in 0..n_features {
            let column: Vec<f64> = rows.iter().map(|row| row[j]).collect();
            let std_dev = column.iter().population_std_dev();
            mean.push(column.iter().mean());
            // Constant columns pass through centred but unscaled
            scale.push(if std_dev > 0.0 && std_dev.is_finite() {
                std_dev
            } else {
                1.0
            });
        }

        Ok(Self {
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            mean,
            scale,
        })
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Rejects artifacts whose fitted column layout differs from `expected`.
    pub fn ensure_layout(&self, expected: &[&str]) -> Result<(), PredictionError> {
        ensure_feature_order(expected, &self.feature_names)?;
        if self.mean.len() != expected.len() || self.scale.len() != expected.len() {
            return Err(PredictionError::shape_mismatch(
                format!("{} scaler parameters", expected.len()),
                format!("{} means, {} scales", self.mean.len(), self.scale.len()),
            ));
        }
        Ok(())
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        check_width(self.mean.len(), row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}

/// Rescales every feature into [0, 1] using the observed min and max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, PredictionError> {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        check_rows(n_features, rows)?;

        let mut min = vec![f64::INFINITY; n_features];
        let mut max = vec![f64::NEG_INFINITY; n_features];
        for row in rows {
            for (j, value) in row.iter().enumerate() {
                min[j] = min[j].min(*value);
                max[j] = max[j].max(*value);
            }
        }
        Ok(Self { min, max })
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        check_width(self.min.len(), row.len())?;
        Ok(row
            .iter()
            .zip(self.min.iter().zip(self.max.iter()))
            .map(|(x, (lo, hi))| {
                let range = hi - lo;
                if range > 0.0 { (x - lo) / range } else { 0.0 }
            })
            .collect())
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PredictionError> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>), PredictionError> {
        let scaler = Self::fit(rows)?;
        let scaled = scaler.transform(rows)?;
        Ok((scaler, scaled))
    }
}

fn check_rows(n_features: usize, rows: &[Vec<f64>]) -> Result<(), PredictionError> {
    if rows.is_empty() || n_features == 0 {
        return Err(PredictionError::model("cannot fit a scaler on empty data"));
    }
    for row in rows {
        check_width(n_features, row.len())?;
    }
    Ok(())
}

fn check_width(expected: usize, actual: usize) -> Result<(), PredictionError> {
    if expected != actual {
        return Err(PredictionError::shape_mismatch(
            format!("{expected} features"),
            format!("{actual} features"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_centres_columns() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let scaler = StandardScaler::fit(&["a", "b"], &rows).unwrap();
        assert_eq!(scaler.mean, vec![2.0, 10.0]);
        assert!((scaler.scale[0] - 1.0).abs() < 1e-12);
        // constant column keeps unit scale
        assert_eq!(scaler.scale[1], 1.0);

        let out = scaler.transform(&[3.0, 12.0]).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_rejects_wrong_width() {
        let scaler = StandardScaler::fit(&["a", "b"], &[vec![1.0, 2.0]]).unwrap();
        let err = scaler.transform(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_min_max_scales_into_unit_range() {
        let rows = vec![vec![10.0, 5.0], vec![20.0, 5.0], vec![15.0, 5.0]];
        let (scaler, scaled) = MinMaxScaler::fit_transform(&rows).unwrap();
        assert_eq!(scaler.min, vec![10.0, 5.0]);
        assert_eq!(scaled[0], vec![0.0, 0.0]);
        assert_eq!(scaled[1], vec![1.0, 0.0]);
        assert_eq!(scaled[2], vec![0.5, 0.0]);
    }

    #[test]
    fn test_min_max_empty_rows_fail() {
        assert!(MinMaxScaler::fit(&[]).is_err());
    }

    #[test]
    fn test_layout_check() {
        let scaler = StandardScaler::fit(&["a", "b"], &[vec![1.0, 2.0]]).unwrap();
        assert!(scaler.ensure_layout(&["a", "b"]).is_ok());
        assert!(scaler.ensure_layout(&["b", "a"]).is_err());
        assert!(scaler.ensure_layout(&["a", "b", "c"]).is_err());
    }
}
