use super::predictor::RiskClassifier;
use super::smartcore_predictor::SmartCoreRiskClassifier;
use crate::domain::errors::PredictionError;
use crate::domain::health::{PatientRecord, RiskPrediction};
use crate::domain::ml::StandardScaler;
use crate::domain::ml::feature_registry::HEART_FEATURE_NAMES;
use crate::domain::ports::{ArtifactName, ArtifactStore};
use tracing::{debug, info};

/// A fitted scaler paired with a fitted classifier.
///
/// Construction checks that both agree with [`HEART_FEATURE_NAMES`], so a
/// `RiskModel` that exists can always score a `PatientRecord`.
pub struct RiskModel<C: RiskClassifier = SmartCoreRiskClassifier> {
    scaler: StandardScaler,
    classifier: C,
}

impl<C: RiskClassifier> std::fmt::Debug for RiskModel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskModel")
            .field("scaler", &self.scaler)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl<C: RiskClassifier> RiskModel<C> {
    pub fn new(scaler: StandardScaler, classifier: C) -> Result<Self, PredictionError> {
        scaler.ensure_layout(HEART_FEATURE_NAMES)?;
        if classifier.n_features() != scaler.n_features() {
            return Err(PredictionError::shape_mismatch(
                format!("classifier over {} features", scaler.n_features()),
                format!("classifier over {} features", classifier.n_features()),
            ));
        }
        Ok(Self { scaler, classifier })
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Scale, then classify. No state changes; same record, same answer.
    pub fn assess(&self, record: &PatientRecord) -> Result<RiskPrediction, PredictionError> {
        let scaled = self.scaler.transform(&record.to_features())?;
        let label = self.classifier.predict(&scaled)?;
        let probability = self.classifier.predict_proba(&scaled)?;
        debug!(
            "RiskModel: {} -> {} (p={:.4})",
            self.classifier.name(),
            label,
            probability
        );
        Ok(RiskPrediction { label, probability })
    }
}

impl RiskModel<SmartCoreRiskClassifier> {
    /// Loads `scaler.json` and `model.json` from the store.
    pub fn load(store: &dyn ArtifactStore) -> Result<Self, PredictionError> {
        let scaler_bytes = store.read(ArtifactName::Scaler)?;
        let scaler: StandardScaler =
            serde_json::from_slice(&scaler_bytes).map_err(|e| PredictionError::ModelLoad {
                artifact: ArtifactName::Scaler.file_name().to_string(),
                reason: format!("Failed to deserialize scaler: {}", e),
            })?;

        let classifier_bytes = store.read(ArtifactName::Classifier)?;
        let classifier = SmartCoreRiskClassifier::from_json(&classifier_bytes)?;

        let model = Self::new(scaler, classifier)?;
        info!(
            "RiskModel: loaded {} over {} features",
            model.classifier.name(),
            model.scaler.n_features()
        );
        Ok(model)
    }

    /// Writes both artifacts under their logical names.
    pub fn save(&self, store: &dyn ArtifactStore) -> Result<(), PredictionError> {
        let scaler_bytes = serde_json::to_vec(&self.scaler).map_err(PredictionError::model)?;
        store.write(ArtifactName::Scaler, &scaler_bytes)?;
        store.write(ArtifactName::Classifier, &self.classifier.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::health::{PatientForm, RiskLabel};

    /// Fixed-weight stand-in: probability grows with cholesterol.
    struct CholesterolClassifier;

    impl RiskClassifier for CholesterolClassifier {
        fn predict_proba(&self, scaled: &[f64]) -> Result<f64, PredictionError> {
            Ok(1.0 / (1.0 + (-scaled[4]).exp()))
        }

        fn n_features(&self) -> usize {
            HEART_FEATURE_NAMES.len()
        }

        fn name(&self) -> &str {
            "cholesterol stub"
        }
    }

    fn unit_scaler() -> StandardScaler {
        StandardScaler {
            feature_names: HEART_FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            mean: vec![0.0; 13],
            scale: vec![1.0; 13],
        }
    }

    #[test]
    fn test_assess_is_deterministic() {
        let mut scaler = unit_scaler();
        scaler.mean[4] = 200.0;
        scaler.scale[4] = 50.0;
        let model = RiskModel::new(scaler, CholesterolClassifier).unwrap();

        let record = PatientRecord::encode(&PatientForm {
            cholesterol: 300,
            ..Default::default()
        })
        .unwrap();

        let first = model.assess(&record).unwrap();
        let second = model.assess(&record).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.label, RiskLabel::Disease);
        // (300 - 200) / 50 = 2
        assert!((first.probability - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_order_mismatch_rejected() {
        let mut scaler = unit_scaler();
        scaler.feature_names.swap(2, 3);
        let err = RiskModel::new(scaler, CholesterolClassifier).unwrap_err();
        assert!(matches!(err, PredictionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_scaler_width_mismatch_rejected() {
        let mut scaler = unit_scaler();
        scaler.mean.pop();
        let err = RiskModel::new(scaler, CholesterolClassifier).unwrap_err();
        assert!(matches!(err, PredictionError::ShapeMismatch { .. }));
    }
}
