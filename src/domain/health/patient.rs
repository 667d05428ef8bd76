use super::categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
    Thalassemia,
};
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::HEART_FEATURE_NAMES;
use serde::{Deserialize, Serialize};

pub const AGE_RANGE: (i64, i64) = (0, 120);
pub const RESTING_BP_RANGE: (i64, i64) = (50, 200);
pub const CHOLESTEROL_RANGE: (i64, i64) = (50, 600);
pub const MAX_HEART_RATE_RANGE: (i64, i64) = (50, 250);
pub const ST_DEPRESSION_RANGE: (f64, f64) = (0.0, 10.0);
pub const VESSELS_COLORED_LEVELS: [u8; 4] = [0, 1, 2, 3];

/// Raw patient input exactly as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientForm {
    pub age: i64,
    pub sex: String,
    pub chest_pain_type: String,
    pub resting_bp: i64,
    pub cholesterol: i64,
    pub fasting_blood_sugar: String,
    pub resting_ecg: String,
    pub max_heart_rate: i64,
    pub exercise_angina: String,
    pub st_depression: f64,
    pub st_slope: String,
    pub vessels_colored: i64,
    pub thalassemia: String,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            age: 45,
            sex: Sex::Male.label().to_string(),
            chest_pain_type: ChestPainType::NoPain.label().to_string(),
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: FastingBloodSugar::No.label().to_string(),
            resting_ecg: RestingEcg::Normal.label().to_string(),
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::No.label().to_string(),
            st_depression: 0.5,
            st_slope: StSlope::Upsloping.label().to_string(),
            vessels_colored: 0,
            thalassemia: Thalassemia::Normal.label().to_string(),
        }
    }
}

/// A fully validated and encoded patient, ready for the scaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u8,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_bp: u16,
    pub cholesterol: u16,
    pub fasting_blood_sugar: FastingBloodSugar,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u16,
    pub exercise_angina: ExerciseAngina,
    pub st_depression: f64,
    pub st_slope: StSlope,
    pub vessels_colored: u8,
    pub thalassemia: Thalassemia,
}

impl PatientRecord {
    /// Validates numeric bounds and decodes every categorical label.
    pub fn encode(form: &PatientForm) -> Result<Self, PredictionError> {
        Ok(Self {
            age: bounded_int("age", form.age, AGE_RANGE)? as u8,
            sex: Sex::from_label(&form.sex)?,
            chest_pain_type: ChestPainType::from_label(&form.chest_pain_type)?,
            resting_bp: bounded_int("trestbps", form.resting_bp, RESTING_BP_RANGE)? as u16,
            cholesterol: bounded_int("chol", form.cholesterol, CHOLESTEROL_RANGE)? as u16,
            fasting_blood_sugar: FastingBloodSugar::from_label(&form.fasting_blood_sugar)?,
            resting_ecg: RestingEcg::from_label(&form.resting_ecg)?,
            max_heart_rate: bounded_int("thalach", form.max_heart_rate, MAX_HEART_RATE_RANGE)?
                as u16,
            exercise_angina: ExerciseAngina::from_label(&form.exercise_angina)?,
            st_depression: st_depression(form.st_depression)?,
            st_slope: StSlope::from_label(&form.st_slope)?,
            vessels_colored: vessels_colored(form.vessels_colored)?,
            thalassemia: Thalassemia::from_label(&form.thalassemia)?,
        })
    }

    /// Feature vector in the exact column order of [`HEART_FEATURE_NAMES`].
    pub fn to_features(&self) -> Vec<f64> {
        let features = vec![
            f64::from(self.age),
            f64::from(self.sex.code()),
            f64::from(self.chest_pain_type.code()),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(self.fasting_blood_sugar.code()),
            f64::from(self.resting_ecg.code()),
            f64::from(self.max_heart_rate),
            f64::from(self.exercise_angina.code()),
            self.st_depression,
            f64::from(self.st_slope.code()),
            f64::from(self.vessels_colored),
            f64::from(self.thalassemia.code()),
        ];
        debug_assert_eq!(features.len(), HEART_FEATURE_NAMES.len());
        features
    }
}

fn bounded_int(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<i64, PredictionError> {
    if value < min || value > max {
        return Err(PredictionError::InvalidField {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(value)
}

/// Snaps to the form's 0.1 step after the bounds check.
fn st_depression(value: f64) -> Result<f64, PredictionError> {
    let (min, max) = ST_DEPRESSION_RANGE;
    if !value.is_finite() || value < min || value > max {
        return Err(PredictionError::InvalidField {
            field: "oldpeak",
            value,
            min,
            max,
        });
    }
    Ok((value * 10.0).round() / 10.0)
}

fn vessels_colored(value: i64) -> Result<u8, PredictionError> {
    VESSELS_COLORED_LEVELS
        .iter()
        .copied()
        .find(|level| i64::from(*level) == value)
        .ok_or_else(|| PredictionError::InvalidCategory {
            field: "ca",
            value: value.to_string(),
        })
}
