use serde::Serialize;

/// Feature order shared with the scaler and model at training time.
pub const FEATURE_NAMES: [&str; 8] = [
    "age",
    "attendance_rate",
    "average_test_score",
    "extracurricular_score",
    "coding_skill_score",
    "communication_score",
    "leadership_score",
    "internship_experience",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub age: f64,
    pub attendance_rate: f64,
    pub average_test_score: f64,
    pub extracurricular_score: f64,
    pub coding_skill_score: f64,
    pub communication_score: f64,
    pub leadership_score: f64,
    pub internship_experience: f64,
}

impl StudentRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.age,
            self.attendance_rate,
            self.average_test_score,
            self.extracurricular_score,
            self.coding_skill_score,
            self.communication_score,
            self.leadership_score,
            self.internship_experience,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightReport {
    #[serde(rename = "Strengths")]
    pub strengths: Vec<String>,
    #[serde(rename = "Weaknesses")]
    pub weaknesses: Vec<String>,
    #[serde(rename = "Recommendations")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub prediction: f64,
    pub insights: InsightReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(PredictionReport),
    Failure(ErrorReport),
}
