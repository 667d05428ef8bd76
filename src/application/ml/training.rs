use super::predictor::RiskClassifier;
use super::risk_model::RiskModel;
use super::smartcore_predictor::SmartCoreRiskClassifier;
use crate::domain::errors::PredictionError;
use crate::domain::health::RiskLabel;
use crate::domain::ml::StandardScaler;
use crate::domain::ml::feature_registry::HEART_FEATURE_NAMES;
use serde::Deserialize;
use tracing::info;

/// One row of the UCI heart-disease CSV, in model column order plus `target`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartTrainingRecord {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
    pub target: i32,
}

impl HeartTrainingRecord {
    // Must match HEART_FEATURE_NAMES order exactly
    pub fn features(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Any non-zero target counts as disease.
    pub fn label(&self) -> i32 {
        i32::from(self.target != 0)
    }
}

#[derive(Debug)]
pub struct TrainedRiskModel {
    pub model: RiskModel<SmartCoreRiskClassifier>,
    /// Share of training rows the fitted model classifies correctly.
    pub in_sample_accuracy: f64,
    pub samples: usize,
}

/// Fits the standard scaler, then a logistic regression on the scaled rows.
pub fn train_risk_model(records: &[HeartTrainingRecord]) -> Result<TrainedRiskModel, PredictionError> {
    let rows: Vec<Vec<f64>> = records.iter().map(HeartTrainingRecord::features).collect();
    let labels: Vec<i32> = records.iter().map(HeartTrainingRecord::label).collect();

    let scaler = StandardScaler::fit(HEART_FEATURE_NAMES, &rows)?;
    let scaled = rows
        .iter()
        .map(|row| scaler.transform(row))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Training logistic regression on {} samples...", scaled.len());
    let classifier = SmartCoreRiskClassifier::fit(&scaled, &labels)?;

    let mut correct = 0usize;
    for (row, label) in scaled.iter().zip(labels.iter()) {
        if classifier.predict(row)? == RiskLabel::from_class(*label) {
            correct += 1;
        }
    }
    let in_sample_accuracy = correct as f64 / scaled.len() as f64;

    Ok(TrainedRiskModel {
        model: RiskModel::new(scaler, classifier)?,
        in_sample_accuracy,
        samples: scaled.len(),
    })
}
