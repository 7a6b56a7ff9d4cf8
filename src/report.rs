use crate::error::PipelineError;
use crate::models::{ErrorReport, PredictionReport, ResponseEnvelope};

pub fn render_success(report: PredictionReport) -> String {
    render(&ResponseEnvelope::Success(report))
}

pub fn render_failure(err: &anyhow::Error) -> String {
    render(&ResponseEnvelope::Failure(failure(err)))
}

/// Decode failures carry the parser detail; everything else carries the
/// full error chain as its traceback.
pub fn failure(err: &anyhow::Error) -> ErrorReport {
    if let Some(decode) = err.downcast_ref::<PipelineError>() {
        if let PipelineError::InvalidJson { details } = decode {
            return ErrorReport {
                error: decode.to_string(),
                details: Some(details.clone()),
                traceback: None,
            };
        }
    }

    ErrorReport {
        error: format!("{err:#}"),
        details: None,
        traceback: Some(format!("{err:?}")),
    }
}

pub fn render(envelope: &ResponseEnvelope) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|err| {
        serde_json::json!({ "error": format!("failed to serialize response: {err}") }).to_string()
    })
}
