use super::price_point::PricePoint;
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::{PRICE_FEATURE_COUNT, price_features};
use chrono::NaiveDate;
use serde::Serialize;

/// Features of one day paired with the following day's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub features: [f64; PRICE_FEATURE_COUNT],
    pub label: f64,
}

impl FrameRow {
    pub fn close(&self) -> f64 {
        self.features[3]
    }
}

/// Supervised frame: row `i` holds point `i`'s features and point `i + 1`'s close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingFrame {
    rows: Vec<FrameRow>,
}

impl TrainingFrame {
    pub const MIN_POINTS: usize = 2;

    /// Shifts close back by one step and drops the final, label-less point.
    /// Order is preserved exactly; nothing is sorted or deduplicated.
    pub fn build(points: &[PricePoint]) -> Result<Self, PredictionError> {
        if points.len() < Self::MIN_POINTS {
            return Err(PredictionError::InsufficientData {
                required: Self::MIN_POINTS,
                available: points.len(),
            });
        }

        let rows = points
            .windows(2)
            .map(|pair| FrameRow {
                date: pair[0].date,
                features: price_features(&pair[0]),
                label: pair[1].close,
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row. A built frame always has at least one.
    pub fn last(&self) -> Option<&FrameRow> {
        self.rows.last()
    }

    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|row| row.features.to_vec()).collect()
    }

    pub fn labels(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.5 + i as f64,
                volume: 1_000.0 * (i + 1) as f64,
            })
            .collect()
    }

    #[test]
    fn test_frame_shifts_close() {
        let pts = points(5);
        let frame = TrainingFrame::build(&pts).unwrap();

        assert_eq!(frame.len(), pts.len() - 1);
        for (i, row) in frame.rows().iter().enumerate() {
            assert_eq!(row.date, pts[i].date);
            assert_eq!(row.label, pts[i + 1].close);
            assert_eq!(row.close(), pts[i].close);
        }
    }

    #[test]
    fn test_order_is_not_touched() {
        // Deliberately unsorted and duplicated input
        let mut pts = points(3);
        pts.swap(0, 2);
        pts.push(pts[0]);

        let frame = TrainingFrame::build(&pts).unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.rows()[0].date, pts[0].date);
        assert_eq!(frame.rows()[2].label, pts[3].close);
    }

    #[test]
    fn test_two_points_make_one_row() {
        let frame = TrainingFrame::build(&points(2)).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.labels(), vec![101.5]);
    }

    #[test]
    fn test_insufficient_data() {
        for n in 0..2 {
            let err = TrainingFrame::build(&points(n)).unwrap_err();
            match err {
                PredictionError::InsufficientData {
                    required,
                    available,
                } => {
                    assert_eq!(required, 2);
                    assert_eq!(available, n);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
