use super::feature_importance::{FeatureImportance, permutation_importance};
use crate::domain::errors::PredictionError;
use crate::domain::market::TrainingFrame;
use crate::domain::ml::feature_registry::{PRICE_FEATURE_COUNT, PRICE_FEATURE_NAMES};
use crate::domain::ml::{InSampleFit, MinMaxScaler};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

pub const RANDOM_FOREST_TREES: usize = 100;
pub const RANDOM_FOREST_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceModelKind {
    #[default]
    LinearRegression,
    RandomForest,
}

impl PriceModelKind {
    /// Fewest price points the estimator can be fitted on.
    ///
    /// The SVD least-squares solve needs at least as many frame rows as
    /// features plus the intercept; the forest fits any non-empty frame.
    pub fn min_points(self) -> usize {
        match self {
            PriceModelKind::LinearRegression => PRICE_FEATURE_COUNT + 2,
            PriceModelKind::RandomForest => TrainingFrame::MIN_POINTS,
        }
    }
}

impl fmt::Display for PriceModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceModelKind::LinearRegression => write!(f, "Linear Regression"),
            PriceModelKind::RandomForest => write!(f, "Random Forest"),
        }
    }
}

impl FromStr for PriceModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "linear" | "linear-regression" | "lr" => Ok(PriceModelKind::LinearRegression),
            "random-forest" | "forest" | "rf" => Ok(PriceModelKind::RandomForest),
            _ => anyhow::bail!(
                "Invalid model type: {}. Must be 'linear-regression' or 'random-forest'",
                s
            ),
        }
    }
}

enum FittedRegressor {
    Linear(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Forest(RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>),
}

impl FittedRegressor {
    fn fit(kind: PriceModelKind, x: &DenseMatrix<f64>, y: &Vec<f64>) -> Result<Self, PredictionError> {
        match kind {
            PriceModelKind::LinearRegression => {
                let params = LinearRegressionParameters::default()
                    .with_solver(LinearRegressionSolverName::SVD);
                LinearRegression::fit(x, y, params)
                    .map(FittedRegressor::Linear)
                    .map_err(|e| PredictionError::model(format!("Training error: {}", e)))
            }
            PriceModelKind::RandomForest => {
                let params = RandomForestRegressorParameters::default()
                    .with_n_trees(RANDOM_FOREST_TREES)
                    .with_seed(RANDOM_FOREST_SEED);
                RandomForestRegressor::fit(x, y, params)
                    .map(FittedRegressor::Forest)
                    .map_err(|e| PredictionError::model(format!("Training error: {}", e)))
            }
        }
    }

    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, PredictionError> {
        let result = match self {
            FittedRegressor::Linear(model) => model.predict(x),
            FittedRegressor::Forest(model) => model.predict(x),
        };
        result.map_err(|e| PredictionError::model(format!("Predict error: {}", e)))
    }
}

/// A regressor fitted on one min-max scaled frame.
///
/// Fitting, scaling and every metric use the same rows; there is no held-out
/// split, so [`PriceModel::in_sample_fit`] measures fit quality only.
pub struct PriceModel {
    kind: PriceModelKind,
    scaler: MinMaxScaler,
    regressor: FittedRegressor,
    scaled: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

impl PriceModel {
    pub fn fit(frame: &TrainingFrame, kind: PriceModelKind) -> Result<Self, PredictionError> {
        if frame.is_empty() {
            return Err(PredictionError::InsufficientData {
                required: TrainingFrame::MIN_POINTS,
                available: 0,
            });
        }
        // A frame of n rows was built from n + 1 points
        let available = frame.len() + 1;
        if available < kind.min_points() {
            return Err(PredictionError::InsufficientData {
                required: kind.min_points(),
                available,
            });
        }

        let (scaler, scaled) = MinMaxScaler::fit_transform(&frame.feature_rows())?;
        let labels = frame.labels();
        let x = to_matrix(&scaled)?;

        info!("Fitting {} on {} rows...", kind, scaled.len());
        let regressor = FittedRegressor::fit(kind, &x, &labels)?;

        Ok(Self {
            kind,
            scaler,
            regressor,
            scaled,
            labels,
        })
    }

    pub fn kind(&self) -> PriceModelKind {
        self.kind
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Predicts from already-scaled rows.
    pub fn predict_scaled(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        self.regressor.predict(&to_matrix(rows)?)
    }

    /// Next close, predicted from the most recent frame row.
    pub fn predict_next_close(&self) -> Result<f64, PredictionError> {
        let last = self
            .scaled
            .last()
            .ok_or_else(|| PredictionError::model("model has no rows"))?;
        let prediction = self
            .predict_scaled(std::slice::from_ref(last))?
            .first()
            .copied()
            .ok_or_else(|| PredictionError::model("No prediction returned"))?;

        if !prediction.is_finite() {
            return Err(PredictionError::model("non-finite prediction"));
        }
        debug!("PriceModel: next close prediction {:.4}", prediction);
        Ok(prediction)
    }

    /// RMSE / R² on the fitting rows themselves.
    pub fn in_sample_fit(&self) -> Result<InSampleFit, PredictionError> {
        let predictions = self.predict_scaled(&self.scaled)?;
        Ok(InSampleFit::calculate(&self.labels, &predictions))
    }

    /// Random forest only; `None` for linear regression.
    pub fn feature_importance(&self) -> Result<Option<Vec<FeatureImportance>>, PredictionError> {
        if self.kind != PriceModelKind::RandomForest {
            return Ok(None);
        }
        let scores = permutation_importance(
            |rows| self.predict_scaled(rows),
            &self.scaled,
            &self.labels,
            PRICE_FEATURE_NAMES,
            RANDOM_FOREST_SEED,
        )?;
        Ok(Some(scores))
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, PredictionError> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
        .map_err(|e| PredictionError::model(format!("Matrix error: {}", e)))
}
