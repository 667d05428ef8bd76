//! Closed label sets for the categorical patient fields.
//!
//! Each field is a small enum whose levels carry the exact label shown on the
//! input form and the integer code the classifier was trained on. The maps are
//! fixed and total: every label decodes to exactly one level and every level
//! has exactly one code.

use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait Categorical: Copy + PartialEq + Sized + 'static {
    /// Model column name, used in error messages.
    const FIELD: &'static str;
    /// All levels in form order.
    const LEVELS: &'static [Self];

    fn label(self) -> &'static str;

    fn code(self) -> u8;

    fn from_label(label: &str) -> Result<Self, PredictionError> {
        Self::LEVELS
            .iter()
            .copied()
            .find(|level| level.label() == label)
            .ok_or_else(|| PredictionError::InvalidCategory {
                field: Self::FIELD,
                value: label.to_string(),
            })
    }

    /// Label to code in a single step.
    fn encode(label: &str) -> Result<u8, PredictionError> {
        Self::from_label(label).map(Self::code)
    }

    fn labels() -> Vec<&'static str> {
        Self::LEVELS.iter().map(|level| level.label()).collect()
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => ($label:literal, $code:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Categorical for $name {
            const FIELD: &'static str = $field;
            const LEVELS: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical!(
    Sex, "sex" {
        Male => ("Male", 1),
        Female => ("Female", 0),
    }
);

categorical!(
    ChestPainType, "cp" {
        NoPain => ("No Pain", 0),
        TypicalAngina => ("Typical Angina", 1),
        AtypicalAngina => ("Atypical Angina", 2),
        NonAnginalPain => ("Non-Anginal Pain", 3),
        SeverePain => ("Severe Pain", 4),
    }
);

categorical!(
    /// Fasting blood sugar above 120 mg/dL.
    FastingBloodSugar, "fbs" {
        No => ("No", 0),
        Yes => ("Yes", 1),
    }
);

categorical!(
    RestingEcg, "restecg" {
        Normal => ("Normal", 0),
        AbnormalStTWave => ("Abnormal ST-T Wave", 1),
        Hypertrophy => ("Probable or Definite Hypertrophy", 2),
    }
);

categorical!(
    ExerciseAngina, "exang" {
        No => ("No", 0),
        Yes => ("Yes", 1),
    }
);

categorical!(
    /// Slope of the peak exercise ST segment.
    StSlope, "slope" {
        Upsloping => ("Upsloping", 1),
        Flat => ("Flat", 2),
        Downsloping => ("Downsloping", 3),
    }
);

categorical!(
    Thalassemia, "thal" {
        Normal => ("Normal", 1),
        FixedDefect => ("Fixed Defect", 2),
        ReversibleDefect => ("Reversible Defect", 3),
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_bijection<C: Categorical>() {
        let labels: HashSet<_> = C::LEVELS.iter().map(|l| l.label()).collect();
        let codes: HashSet<_> = C::LEVELS.iter().map(|l| l.code()).collect();
        assert_eq!(labels.len(), C::LEVELS.len(), "duplicate label in {}", C::FIELD);
        assert_eq!(codes.len(), C::LEVELS.len(), "duplicate code in {}", C::FIELD);

        for level in C::LEVELS {
            let decoded = C::from_label(level.label()).unwrap();
            assert!(decoded == *level);
            // Deterministic on repeat
            assert_eq!(C::encode(level.label()).unwrap(), level.code());
            assert_eq!(C::encode(level.label()).unwrap(), level.code());
        }
    }

    #[test]
    fn test_all_fields_are_bijections() {
        assert_bijection::<Sex>();
        assert_bijection::<ChestPainType>();
        assert_bijection::<FastingBloodSugar>();
        assert_bijection::<RestingEcg>();
        assert_bijection::<ExerciseAngina>();
        assert_bijection::<StSlope>();
        assert_bijection::<Thalassemia>();
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(Sex::encode("Male").unwrap(), 1);
        assert_eq!(Sex::encode("Female").unwrap(), 0);
        assert_eq!(ChestPainType::encode("Severe Pain").unwrap(), 4);
        assert_eq!(ChestPainType::encode("Non-Anginal Pain").unwrap(), 3);
        assert_eq!(RestingEcg::encode("Probable or Definite Hypertrophy").unwrap(), 2);
        assert_eq!(StSlope::encode("Upsloping").unwrap(), 1);
        assert_eq!(Thalassemia::encode("Reversible Defect").unwrap(), 3);
        assert_eq!(ExerciseAngina::encode("Yes").unwrap(), 1);
        assert_eq!(FastingBloodSugar::encode("No").unwrap(), 0);
    }

    #[test]
    fn test_unknown_label_fails_fast() {
        let err = ChestPainType::encode("Mild Pain").unwrap_err();
        match err {
            PredictionError::InvalidCategory { field, value } => {
                assert_eq!(field, "cp");
                assert_eq!(value, "Mild Pain");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!(Sex::from_label("male").is_err());
        assert!(Thalassemia::from_label("normal").is_err());
    }

    #[test]
    fn test_labels_follow_form_order() {
        assert_eq!(
            ChestPainType::labels(),
            vec![
                "No Pain",
                "Typical Angina",
                "Atypical Angina",
                "Non-Anginal Pain",
                "Severe Pain"
            ]
        );
    }
}
