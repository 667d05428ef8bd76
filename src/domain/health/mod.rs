// Patient input, categorical encoding and rule-based commentary
pub mod assessment;
pub mod categorical;
pub mod patient;
pub mod risk_factors;

pub use assessment::{HeartAssessment, RiskLabel, RiskPrediction};
pub use categorical::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
    Thalassemia,
};
pub use patient::{PatientForm, PatientRecord};
pub use risk_factors::{RiskFactor, explain};
