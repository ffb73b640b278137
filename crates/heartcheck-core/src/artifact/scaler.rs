//! Fitted standard scaler.

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};

/// A fitted standardization transform: `(x - mean) / scale` per column.
///
/// Columns follow the model's feature layout. `feature_names`, when the
/// trainer records it, must match the model's list exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    #[must_use]
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            feature_names: None,
            mean,
            scale,
        }
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Check the parameters against the expected column count.
    pub fn validate(&self, expected: usize) -> Result<(), ArtifactError> {
        if self.mean.len() != expected {
            return Err(ArtifactError::Dimension {
                what: "scaler mean",
                expected,
                actual: self.mean.len(),
            });
        }
        if self.scale.len() != expected {
            return Err(ArtifactError::Dimension {
                what: "scaler scale",
                expected,
                actual: self.scale.len(),
            });
        }
        if let Some(names) = &self.feature_names
            && names.len() != expected
        {
            return Err(ArtifactError::Dimension {
                what: "scaler feature names",
                expected,
                actual: names.len(),
            });
        }
        if self
            .mean
            .iter()
            .chain(&self.scale)
            .any(|v| !v.is_finite())
        {
            return Err(ArtifactError::InvalidParameter(
                "scaler parameters must be finite".into(),
            ));
        }
        // Zero marks a constant column. Anything else must divide safely.
        if let Some(scale) = self
            .scale
            .iter()
            .find(|s| **s < 0.0 || (**s != 0.0 && !s.is_normal()))
        {
            return Err(ArtifactError::InvalidParameter(format!(
                "scaler scale must be zero or a positive normal number, got {scale:e}"
            )));
        }
        Ok(())
    }

    /// Standardize one row.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if row.len() != self.width() {
            return Err(ArtifactError::Dimension {
                what: "scaler input",
                expected: self.width(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, mean), scale)| {
                // A constant training column has zero variance; leave it unscaled.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
