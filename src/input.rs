use serde_json::{Map, Value};

use crate::error::PipelineError;
use crate::models::StudentRecord;

/// Parse stdin contents into a JSON object.
pub fn parse_request(raw: &str) -> Result<Map<String, Value>, PipelineError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| PipelineError::InvalidJson {
        details: err.to_string(),
    })?;

    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(PipelineError::InvalidJson {
            details: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

impl StudentRecord {
    /// Extract the eight required features in training order.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, PipelineError> {
        let field = |name: &'static str| -> Result<f64, PipelineError> {
            let value = fields.get(name).ok_or(PipelineError::MissingField(name))?;
            coerce_f64(value).ok_or_else(|| PipelineError::NonNumericField {
                field: name,
                value: value.to_string(),
            })
        };

        Ok(Self {
            age: field("age")?,
            attendance_rate: field("attendance_rate")?,
            average_test_score: field("average_test_score")?,
            extracurricular_score: field("extracurricular_score")?,
            coding_skill_score: field("coding_skill_score")?,
            communication_score: field("communication_score")?,
            leadership_score: field("leadership_score")?,
            internship_experience: field("internship_experience")?,
        })
    }
}

/// Numbers pass through; strings holding a decimal number are parsed.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
