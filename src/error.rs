use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading the model or scaler from disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found: {}", path.display())]
    Missing { kind: &'static str, path: PathBuf },
    #[error("failed to read {kind} artifact at {}", path.display())]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} artifact at {} is malformed", path.display())]
    Malformed {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} artifact at {} is invalid: {reason}", path.display())]
    Invalid {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },
}

/// Failure raised by a scaler or regressor while evaluating a batch.
#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("{stage} expected {expected} columns, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("model produced an empty output")]
    EmptyOutput,
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}

/// Per-request failure. Every variant ends the request with exit status 1.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid JSON input")]
    InvalidJson { details: String },
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' is not numeric: {value}")]
    NonNumericField { field: &'static str, value: String },
    #[error("inference failed")]
    Inference(#[from] InferenceError),
}
