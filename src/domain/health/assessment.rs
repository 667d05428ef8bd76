use super::patient::PatientRecord;
use super::risk_factors::RiskFactor;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    Healthy,
    Disease,
}

impl RiskLabel {
    pub fn from_class(class: i32) -> Self {
        if class == 1 {
            RiskLabel::Disease
        } else {
            RiskLabel::Healthy
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Healthy => write!(f, "Healthy"),
            RiskLabel::Disease => write!(f, "Heart Disease"),
        }
    }
}

/// Classifier output for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskPrediction {
    pub label: RiskLabel,
    /// Probability of the positive (disease) class, in [0, 1].
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartAssessment {
    pub record: PatientRecord,
    pub prediction: RiskPrediction,
    pub risk_factors: Vec<RiskFactor>,
}
