use crate::application::ml::RiskModel;
use crate::domain::errors::PredictionError;
use crate::domain::health::{HeartAssessment, PatientForm, PatientRecord, explain};
use crate::domain::ports::ArtifactStore;
use std::sync::Arc;
use tracing::info;

/// Runs the heart-disease pipeline for one form submission:
/// encode → load artifacts → scale + classify → rule-based commentary.
pub struct HeartDiseaseService {
    store: Arc<dyn ArtifactStore>,
}

impl HeartDiseaseService {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Artifacts are loaded on every call; nothing is retrained.
    pub fn assess(&self, form: &PatientForm) -> Result<HeartAssessment, PredictionError> {
        let record = PatientRecord::encode(form)?;
        let model = RiskModel::load(self.store.as_ref())?;
        let prediction = model.assess(&record)?;
        let risk_factors = explain(&record);

        info!(
            "HeartDiseaseService: verdict={} probability={:.3} elevated_factors={}",
            prediction.label,
            prediction.probability,
            risk_factors.iter().filter(|f| f.elevated).count()
        );

        Ok(HeartAssessment {
            record,
            prediction,
            risk_factors,
        })
    }
}
