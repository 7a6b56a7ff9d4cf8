//! Weighted heuristic score used by the web dashboard when no trained
//! model is available. Runs on raw (unscaled) features.

use nalgebra::DMatrix;

use crate::error::InferenceError;
use crate::inference::{ensure_columns, Regressor};
use crate::models::FEATURE_COUNT;

/// `(feature index, max value, weight)`; age (index 0) carries no weight.
const WEIGHTS: [(usize, f64, f64); 7] = [
    (2, 100.0, 0.30),
    (1, 100.0, 0.10),
    (3, 10.0, 0.10),
    (4, 10.0, 0.15),
    (5, 10.0, 0.15),
    (6, 10.0, 0.15),
    (7, 10.0, 0.05),
];

/// `(feature index, threshold)`; each value below its threshold costs 5 points.
const PENALTIES: [(usize, f64); 3] = [(1, 60.0), (4, 4.0), (6, 4.0)];
const PENALTY_POINTS: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRubric;

impl WeightedRubric {
    pub fn score(&self, features: &[f64]) -> f64 {
        let raw: f64 = WEIGHTS
            .iter()
            .map(|&(index, max, weight)| features[index] / max * weight * 100.0)
            .sum();
        let penalty: f64 = PENALTIES
            .iter()
            .filter(|&&(index, threshold)| features[index] < threshold)
            .map(|_| PENALTY_POINTS)
            .sum();

        ((raw - penalty) * 100.0).round() / 100.0
    }
}

impl Regressor for WeightedRubric {
    fn predict(&self, batch: &DMatrix<f64>) -> Result<DMatrix<f64>, InferenceError> {
        ensure_columns("rubric input", batch, FEATURE_COUNT)?;

        let scores: Vec<f64> = batch
            .row_iter()
            .map(|row| {
                let features: Vec<f64> = row.iter().copied().collect();
                self.score(&features)
            })
            .collect();

        Ok(DMatrix::from_vec(scores.len(), 1, scores))
    }
}
