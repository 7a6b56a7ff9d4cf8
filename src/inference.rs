//! Capability seams between the pipeline and whatever numerical runtime
//! produced the artifacts.
//!
//! Both traits work on row-major batches (`rows x features`) so an adapter
//! can wrap a batch-oriented framework without reshaping. The pipeline only
//! ever sends a single row.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::InferenceError;
use crate::models::{FeatureVector, FEATURE_COUNT};

pub trait Scaler {
    fn transform(&self, batch: &DMatrix<f64>) -> Result<DMatrix<f64>, InferenceError>;
}

pub trait Regressor {
    fn predict(&self, batch: &DMatrix<f64>) -> Result<DMatrix<f64>, InferenceError>;
}

/// Loaded scaler and model, built once at startup and shared read-only
/// with every pipeline stage.
pub struct Predictor {
    scaler: Box<dyn Scaler>,
    model: Box<dyn Regressor>,
}

impl Predictor {
    pub fn new(scaler: Box<dyn Scaler>, model: Box<dyn Regressor>) -> Self {
        Self { scaler, model }
    }

    pub fn preprocess(&self, features: &FeatureVector) -> Result<DMatrix<f64>, InferenceError> {
        let row = DMatrix::from_row_slice(1, FEATURE_COUNT, features.as_slice());
        let scaled = self.scaler.transform(&row)?;
        ensure_columns("scaler output", &scaled, FEATURE_COUNT)?;
        debug!(scaled = ?scaled.row(0).iter().collect::<Vec<_>>(), "features scaled");
        Ok(scaled)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let scaled = self.preprocess(features)?;
        let output = self.model.predict(&scaled)?;

        if output.nrows() == 0 || output.ncols() == 0 {
            return Err(InferenceError::EmptyOutput);
        }

        let prediction = output[(0, 0)];
        if !prediction.is_finite() {
            return Err(InferenceError::NonFinite(prediction));
        }

        Ok(prediction)
    }
}

pub(crate) fn ensure_columns(
    stage: &'static str,
    batch: &DMatrix<f64>,
    expected: usize,
) -> Result<(), InferenceError> {
    if batch.ncols() == expected {
        Ok(())
    } else {
        Err(InferenceError::ShapeMismatch {
            stage,
            expected,
            actual: batch.ncols(),
        })
    }
}
