use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::ArtifactError;
use crate::models::FEATURE_NAMES;
use crate::network::{DenseNetwork, ModelArtifact};
use crate::scaler::{FeatureScaler, ScalerArtifact};

pub const MODEL_FILE: &str = "performance_prediction_model.json";
pub const SCALER_FILE: &str = "feature_scaler.json";

const MODEL_KIND: &str = "model";
const SCALER_KIND: &str = "scaler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    /// Use the overrides when given, otherwise the files shipped next to
    /// the executable.
    pub fn resolve(model: Option<PathBuf>, scaler: Option<PathBuf>) -> anyhow::Result<Self> {
        if let (Some(model), Some(scaler)) = (&model, &scaler) {
            return Ok(Self {
                model: model.clone(),
                scaler: scaler.clone(),
            });
        }

        let install_dir = install_dir()?;
        Ok(Self::within(&install_dir, model, scaler))
    }

    fn within(dir: &Path, model: Option<PathBuf>, scaler: Option<PathBuf>) -> Self {
        Self {
            model: model.unwrap_or_else(|| dir.join(MODEL_FILE)),
            scaler: scaler.unwrap_or_else(|| dir.join(SCALER_FILE)),
        }
    }
}

pub fn install_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("executable path {} has no parent", exe.display()))
}

pub fn load_model(path: &Path) -> Result<DenseNetwork, ArtifactError> {
    let artifact: ModelArtifact = read_artifact(MODEL_KIND, path)?;
    let invalid = |reason: String| ArtifactError::Invalid {
        kind: MODEL_KIND,
        path: path.to_path_buf(),
        reason,
    };

    if let Some(names) = &artifact.input_features {
        check_feature_names(names).map_err(invalid)?;
    }
    let network = DenseNetwork::from_layers(&artifact.layers).map_err(invalid)?;

    info!(
        path = %path.display(),
        layers = network.depth(),
        outputs = network.output_width(),
        trained_at = ?artifact.trained_at,
        "model loaded"
    );
    Ok(network)
}

pub fn load_scaler(path: &Path) -> Result<FeatureScaler, ArtifactError> {
    let artifact: ScalerArtifact = read_artifact(SCALER_KIND, path)?;
    let invalid = |reason: String| ArtifactError::Invalid {
        kind: SCALER_KIND,
        path: path.to_path_buf(),
        reason,
    };

    if let Some(names) = &artifact.feature_names {
        check_feature_names(names).map_err(invalid)?;
    }
    artifact.scaler.validate().map_err(invalid)?;

    info!(
        path = %path.display(),
        fitted_at = ?artifact.fitted_at,
        "scaler loaded"
    );
    Ok(artifact.scaler)
}

fn read_artifact<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactError::Malformed {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.iter().map(String::as_str).eq(FEATURE_NAMES) {
        Ok(())
    } else {
        Err(format!(
            "feature order {names:?} does not match {FEATURE_NAMES:?}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::Regressor;
    use nalgebra::DMatrix;
    use tempfile::TempDir;

    const MODEL_JSON: &str = r#"{
        "trained_at": "2024-11-02T09:30:00Z",
        "input_features": ["age", "attendance_rate", "average_test_score",
            "extracurricular_score", "coding_skill_score", "communication_score",
            "leadership_score", "internship_experience"],
        "layers": [
            {"weights": [[1], [1], [1], [1], [1], [1], [1], [1]], "bias": [0], "activation": "linear"}
        ]
    }"#;

    const SCALER_JSON: &str = r#"{"kind": "identity"}"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_live_in_the_given_directory() {
        let paths = ArtifactPaths::within(Path::new("/opt/insights"), None, None);
        assert_eq!(paths.model, Path::new("/opt/insights").join(MODEL_FILE));
        assert_eq!(paths.scaler, Path::new("/opt/insights").join(SCALER_FILE));
    }

    #[test]
    fn overrides_take_precedence() {
        let paths = ArtifactPaths::resolve(
            Some(PathBuf::from("/tmp/m.json")),
            Some(PathBuf::from("/tmp/s.json")),
        )
        .unwrap();
        assert_eq!(paths.model, PathBuf::from("/tmp/m.json"));
        assert_eq!(paths.scaler, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn loads_model_and_scaler_from_disk() {
        let dir = TempDir::new().unwrap();
        let model = load_model(&write(&dir, MODEL_FILE, MODEL_JSON)).unwrap();
        let scaler = load_scaler(&write(&dir, SCALER_FILE, SCALER_JSON)).unwrap();

        assert_eq!(scaler, FeatureScaler::Identity);
        let batch = DMatrix::from_row_slice(1, 8, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(model.predict(&batch).unwrap()[(0, 0)], 36.0);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MODEL_FILE);
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { kind: "model", .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn unreadable_path_is_a_read_error_not_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_scaler(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Read { kind: "scaler", .. }));
        assert!(!err.to_string().contains("not found"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = load_scaler(&write(&dir, SCALER_FILE, "{\"kind\": \"stand")).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { kind: "scaler", .. }));
    }

    #[test]
    fn unknown_scaler_kind_is_malformed() {
        let dir = TempDir::new().unwrap();
        let err = load_scaler(&write(&dir, SCALER_FILE, r#"{"kind": "robust"}"#)).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn reordered_feature_names_are_invalid() {
        let dir = TempDir::new().unwrap();
        let json = r#"{
            "kind": "identity",
            "feature_names": ["attendance_rate", "age", "average_test_score",
                "extracurricular_score", "coding_skill_score", "communication_score",
                "leadership_score", "internship_experience"]
        }"#;
        let err = load_scaler(&write(&dir, SCALER_FILE, json)).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { kind: "scaler", .. }));
    }

    #[test]
    fn structurally_broken_model_is_invalid() {
        let dir = TempDir::new().unwrap();
        let json = r#"{"layers": [{"weights": [[1], [1]], "bias": [0]}]}"#;
        let err = load_model(&write(&dir, MODEL_FILE, json)).unwrap_err();
        match err {
            ArtifactError::Invalid { reason, .. } => {
                assert_eq!(reason, "layer 0 takes 2 inputs, expected 8")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
