//! Plain-text rendering of pipeline results for the terminal.

use super::view_models::heart_view_model::GAUGE_WIDTH;
use super::view_models::{HeartViewModel, StockViewModel};
use crate::application::stock_service::StockForecast;
use crate::domain::health::HeartAssessment;
use std::fmt;

const RECENT_BARS: usize = 5;

pub struct HeartReport<'a>(pub &'a HeartAssessment);

impl fmt::Display for HeartReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gauge = HeartViewModel::gauge(self.0);

        writeln!(f, "Prediction Result")?;
        writeln!(f, "=================")?;
        if gauge.is_alert {
            writeln!(f, "⚠ High Risk: {}", gauge.verdict)?;
        } else {
            writeln!(f, "✓ Low Risk: {}", gauge.verdict)?;
        }
        writeln!(f, "Probability of heart disease: {}", gauge.percent)?;
        writeln!(
            f,
            "[{}{}]",
            "#".repeat(gauge.filled),
            "-".repeat(GAUGE_WIDTH - gauge.filled)
        )?;
        writeln!(f)?;
        writeln!(f, "Key Risk Factors (rule-based)")?;
        for line in HeartViewModel::factor_lines(self.0) {
            writeln!(f, "  {:<5} {}: {}", line.marker, line.factor, line.explanation)?;
        }
        Ok(())
    }
}

pub struct StockReport<'a>(pub &'a StockForecast);

impl fmt::Display for StockReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let forecast = self.0;
        let metrics = StockViewModel::metrics(forecast);

        writeln!(f, "Recent Stock Data: {}", forecast.symbol)?;
        writeln!(
            f,
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>14}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        )?;
        for bar in forecast.recent_bars(RECENT_BARS) {
            writeln!(
                f,
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
                bar.date.to_string(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Prediction ({})", forecast.model)?;
        writeln!(f, "  Current Price:    {}", metrics.current)?;
        writeln!(
            f,
            "  Predicted Price:  {} {} {}",
            metrics.predicted, metrics.arrow, metrics.change
        )?;
        writeln!(f)?;

        let fit = &forecast.in_sample;
        writeln!(f, "Model Performance (in-sample, {} rows)", fit.samples)?;
        writeln!(f, "  RMSE:      {:.4}", fit.rmse)?;
        writeln!(f, "  MAE:       {:.4}", fit.mae)?;
        writeln!(f, "  R² Score:  {:.4}", fit.r2)?;
        writeln!(
            f,
            "  Note: measured on the rows the model was fitted on, not on held-out data."
        )?;

        if let Some(importance) = &forecast.feature_importance {
            writeln!(f)?;
            writeln!(f, "Feature Importance")?;
            for entry in importance {
                writeln!(f, "  {:<8} {:>7.4}", entry.feature, entry.importance)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::{FeatureImportance, PriceModelKind};
    use crate::domain::health::{PatientForm, PatientRecord, RiskLabel, RiskPrediction, explain};
    use crate::domain::market::PricePoint;
    use crate::domain::ml::InSampleFit;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn assessment(probability: f64, label: RiskLabel) -> HeartAssessment {
        let record = PatientRecord::encode(&PatientForm::default()).unwrap();
        HeartAssessment {
            record,
            prediction: RiskPrediction { label, probability },
            risk_factors: explain(&record),
        }
    }

    #[test]
    fn test_heart_report_layout() {
        let text = HeartReport(&assessment(0.734, RiskLabel::Disease)).to_string();

        assert!(text.contains("High Risk: Heart Disease"));
        assert!(text.contains("73.4%"));
        assert!(text.contains(&format!("[{}{}]", "#".repeat(37), "-".repeat(13))));
        assert!(text.contains("Key Risk Factors (rule-based)"));
        assert_eq!(text.matches("[ok]").count() + text.matches("[!]").count(), 5);
    }

    #[test]
    fn test_heart_report_low_risk() {
        let text = HeartReport(&assessment(0.0, RiskLabel::Healthy)).to_string();
        assert!(text.contains("Low Risk: Healthy"));
        assert!(text.contains("0.0%"));
        assert!(text.contains(&format!("[{}]", "-".repeat(GAUGE_WIDTH))));
    }

    fn forecast(kind: PriceModelKind) -> StockForecast {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let history: Arc<[PricePoint]> = (0..8)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 1_000.0,
            })
            .collect::<Vec<_>>()
            .into();
        StockForecast {
            symbol: "TSLA".to_string(),
            model: kind,
            history,
            current_price: 106.0,
            predicted_price: 107.06,
            change_pct: Some(1.0),
            in_sample: InSampleFit {
                rmse: 0.5,
                mae: 0.4,
                r2: 0.9,
                samples: 7,
            },
            feature_importance: (kind == PriceModelKind::RandomForest).then(|| {
                vec![FeatureImportance {
                    feature: "close",
                    importance: 1.0,
                }]
            }),
        }
    }

    #[test]
    fn test_stock_report_layout() {
        let text = StockReport(&forecast(PriceModelKind::RandomForest)).to_string();

        // Only the last five bars
        assert!(!text.contains("2024-04-03"));
        assert!(text.contains("2024-04-04"));
        assert!(text.contains("2024-04-08"));
        assert!(text.contains("Prediction (Random Forest)"));
        assert!(text.contains("$107.06 ▲ +1.00%"));
        assert!(text.contains("in-sample"));
        assert!(text.contains("Feature Importance"));
    }

    #[test]
    fn test_linear_report_has_no_importance() {
        let text = StockReport(&forecast(PriceModelKind::LinearRegression)).to_string();
        assert!(text.contains("Prediction (Linear Regression)"));
        assert!(!text.contains("Feature Importance"));
    }
}
