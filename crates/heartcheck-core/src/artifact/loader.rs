//! Reading the artifact pair from disk.

use super::{ModelArtifact, StandardScaler};
use crate::error::ArtifactError;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "heart_disease_model.json";

/// Default location of the scaler artifact.
pub const DEFAULT_SCALER_PATH: &str = "heart_scaler.json";

/// Where the two artifact files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH)
    }
}

impl ArtifactPaths {
    #[must_use]
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }

    /// Both files under `dir`, with their default names.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_MODEL_PATH), dir.join(DEFAULT_SCALER_PATH))
    }

    /// Read both files. Missing files are reported before parse errors.
    pub fn read(&self) -> Result<(ModelArtifact, StandardScaler), ArtifactError> {
        for path in [&self.model, &self.scaler] {
            if !path.exists() {
                return Err(ArtifactError::Missing { path: path.clone() });
            }
        }
        let model = read_json(&self.model)?;
        let scaler = read_json(&self.scaler)?;
        Ok((model, scaler))
    }
}

/// Read and parse one JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one JSON artifact (pretty-printed).
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::artifact::{LogisticRegression, Model, ModelInfo};
    use crate::features::FeatureLayout;

    fn sample_model() -> ModelArtifact {
        ModelArtifact {
            feature_names: FeatureLayout::canonical().to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(vec![0.1; 13], -0.2)),
            info: ModelInfo::default(),
        }
    }

    #[test]
    fn missing_model_is_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());

        let err = paths.read().unwrap_err();
        assert!(err.is_missing());
        assert!(err.to_string().contains(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn missing_scaler_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_json(&paths.model, &sample_model()).unwrap();

        let err = paths.read().unwrap_err();
        assert!(err.is_missing());
        assert!(err.to_string().contains(DEFAULT_SCALER_PATH));
    }

    #[test]
    fn malformed_file_is_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.model, "{ not json").unwrap();
        write_json(&paths.scaler, &StandardScaler::new(vec![0.0; 13], vec![1.0; 13])).unwrap();

        let err = paths.read().unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        write_json(&paths.model, &sample_model()).unwrap();
        write_json(&paths.scaler, &StandardScaler::new(vec![0.0; 13], vec![1.0; 13])).unwrap();

        let (model, scaler) = paths.read().unwrap();
        assert_eq!(model, sample_model());
        assert_eq!(scaler.width(), 13);
    }
}
