use crate::domain::health::{HeartAssessment, RiskLabel};

/// Cells in the probability gauge.
pub const GAUGE_WIDTH: usize = 50;

pub struct RiskGauge {
    /// Disease probability as a percentage, one decimal.
    pub percent: String,
    pub filled: usize,
    pub verdict: String,
    pub is_alert: bool,
}

pub struct FactorLine {
    pub marker: &'static str,
    pub factor: &'static str,
    pub explanation: &'static str,
}

pub struct HeartViewModel;

impl HeartViewModel {
    pub fn gauge(assessment: &HeartAssessment) -> RiskGauge {
        let p = assessment.prediction.probability.clamp(0.0, 1.0);
        RiskGauge {
            percent: format!("{:.1}%", p * 100.0),
            filled: (p * GAUGE_WIDTH as f64).round() as usize,
            verdict: assessment.prediction.label.to_string(),
            is_alert: assessment.prediction.label == RiskLabel::Disease,
        }
    }

    pub fn factor_lines(assessment: &HeartAssessment) -> Vec<FactorLine> {
        assessment
            .risk_factors
            .iter()
            .map(|f| FactorLine {
                marker: if f.elevated { "[!]" } else { "[ok]" },
                factor: f.factor,
                explanation: f.explanation,
            })
            .collect()
    }
}
