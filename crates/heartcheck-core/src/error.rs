//! # Error Types
//!
//! Two failure families:
//! - [`ArtifactError`]: the scaler/model pair could not be loaded or does
//!   not fit the thirteen features. Fatal at startup.
//! - [`RecordError`]: a submitted record has a value outside its field's
//!   domain. Reported back to whoever submitted it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the artifact pair.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An artifact file does not exist.
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    /// An artifact file exists but could not be read.
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file is not valid JSON for its format.
    #[error("malformed artifact {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact's feature list is not a permutation of the known features.
    #[error("feature list mismatch: {0}")]
    FeatureMismatch(String),

    /// A parameter vector has the wrong length.
    #[error("{what}: expected {expected} values, got {actual}")]
    Dimension {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter has a value the pipeline cannot use (NaN, bad class list).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ArtifactError {
    /// True for the one failure surfaced as "model not found".
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Errors raised while building a [`crate::FeatureRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A categorical field carries a code that has no meaning.
    #[error("{field} has no category for code {code}")]
    UnknownCode { field: &'static str, code: i64 },

    /// A numeric field is in range but off its input grid.
    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: &'static str,
        value: f64,
        step: f64,
    },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}
