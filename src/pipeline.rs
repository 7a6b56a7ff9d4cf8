use tracing::{debug, info, info_span};

use crate::error::PipelineError;
use crate::inference::Predictor;
use crate::input;
use crate::insights;
use crate::models::{PredictionReport, StudentRecord};

/// Run one request end to end. Any failure aborts the whole request, so
/// a report never carries insights without a prediction or vice versa.
pub fn process(predictor: &Predictor, raw: &str) -> Result<PredictionReport, PipelineError> {
    let fields = {
        let _stage = info_span!("parse").entered();
        let fields = input::parse_request(raw)?;
        debug!(input = %serde_json::Value::Object(fields.clone()), "received input");
        fields
    };

    let record = {
        let _stage = info_span!("preprocess").entered();
        StudentRecord::from_fields(&fields)?
    };

    let prediction = {
        let _stage = info_span!("predict").entered();
        let prediction = predictor.predict(&record.features())?;
        info!(prediction, "prediction computed");
        prediction
    };

    let insights = {
        let _stage = info_span!("insights").entered();
        let insights = insights::generate_insights(&record);
        info!(
            strengths = insights.strengths.len(),
            weaknesses = insights.weaknesses.len(),
            "insights generated"
        );
        insights
    };

    Ok(PredictionReport {
        prediction,
        insights,
    })
}
