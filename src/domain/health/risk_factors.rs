//! Rule-based risk commentary.
//!
//! These rules read the encoded record only. They never look at the
//! classifier's verdict and are not a model attribution.

use super::categorical::{Categorical, ExerciseAngina};
use super::patient::PatientRecord;
use serde::Serialize;

pub const AGE_THRESHOLD: u8 = 50;
pub const CHEST_PAIN_CODE_THRESHOLD: u8 = 3;
pub const CHOLESTEROL_THRESHOLD: u16 = 200;
pub const ST_DEPRESSION_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskFactor {
    pub factor: &'static str,
    pub explanation: &'static str,
    pub elevated: bool,
}

impl RiskFactor {
    fn rule(
        factor: &'static str,
        elevated: bool,
        elevated_text: &'static str,
        normal_text: &'static str,
    ) -> Self {
        Self {
            factor,
            explanation: if elevated { elevated_text } else { normal_text },
            elevated,
        }
    }
}

/// Always returns five entries, in display order.
pub fn explain(record: &PatientRecord) -> Vec<RiskFactor> {
    vec![
        RiskFactor::rule(
            "Age",
            record.age > AGE_THRESHOLD,
            "Higher risk with older age.",
            "Age is not a significant risk factor.",
        ),
        RiskFactor::rule(
            "Chest Pain Type",
            record.chest_pain_type.code() >= CHEST_PAIN_CODE_THRESHOLD,
            "Severe chest pain is a strong indicator of heart disease.",
            "Chest pain type is not severe.",
        ),
        RiskFactor::rule(
            "Cholesterol",
            record.cholesterol > CHOLESTEROL_THRESHOLD,
            "High cholesterol (>200 mg/dL) increases risk.",
            "Cholesterol level is within normal range.",
        ),
        RiskFactor::rule(
            "Exercise-Induced Angina",
            record.exercise_angina == ExerciseAngina::Yes,
            "Presence of angina during exercise indicates higher risk.",
            "No exercise-induced angina.",
        ),
        RiskFactor::rule(
            "ST Depression",
            record.st_depression > ST_DEPRESSION_THRESHOLD,
            "Significant ST depression indicates reduced blood flow.",
            "ST depression is minimal.",
        ),
    ]
}
