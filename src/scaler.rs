use chrono::{DateTime, Utc};
use nalgebra::DMatrix;
use serde::Deserialize;

use crate::error::InferenceError;
use crate::inference::{ensure_columns, Scaler};
use crate::models::FEATURE_COUNT;

/// JSON export of a fitted scikit-learn scaler.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub fitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub scaler: FeatureScaler,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
    Identity,
}

impl FeatureScaler {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            FeatureScaler::Standard { mean, scale } => {
                check_parameter("mean", mean)?;
                check_parameter("scale", scale)?;
                if let Some(index) = scale.iter().position(|value| *value == 0.0) {
                    return Err(format!("scale[{index}] is zero"));
                }
                Ok(())
            }
            FeatureScaler::MinMax { min, scale } => {
                check_parameter("min", min)?;
                check_parameter("scale", scale)
            }
            FeatureScaler::Identity => Ok(()),
        }
    }
}

impl Scaler for FeatureScaler {
    fn transform(&self, batch: &DMatrix<f64>) -> Result<DMatrix<f64>, InferenceError> {
        ensure_columns("scaler input", batch, FEATURE_COUNT)?;

        let scaled = match self {
            FeatureScaler::Standard { mean, scale } => {
                DMatrix::from_fn(batch.nrows(), batch.ncols(), |r, c| {
                    (batch[(r, c)] - mean[c]) / scale[c]
                })
            }
            FeatureScaler::MinMax { min, scale } => {
                DMatrix::from_fn(batch.nrows(), batch.ncols(), |r, c| {
                    batch[(r, c)] * scale[c] + min[c]
                })
            }
            FeatureScaler::Identity => batch.clone(),
        };

        Ok(scaled)
    }
}

fn check_parameter(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != FEATURE_COUNT {
        return Err(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ));
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(format!("{name} contains a non-finite value"));
    }
    Ok(())
}
