//! Trained classifiers and the model artifact document.

use crate::error::ArtifactError;
use crate::prediction::{ClassProbabilities, Diagnosis};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLASSIFIER TRAIT
// =============================================================================

/// A trained binary classifier over scaled feature rows.
///
/// Class 0 is "healthy", class 1 is "disease".
pub trait Classifier {
    /// Number of input columns.
    fn width(&self) -> usize;

    /// Signed distance from the decision boundary for one scaled row.
    fn decision_function(&self, row: &[f64]) -> Result<f64, ArtifactError>;

    /// Probability of each class for one scaled row.
    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ArtifactError>;

    /// The predicted class for one scaled row.
    fn predict(&self, row: &[f64]) -> Result<Diagnosis, ArtifactError>;
}

// =============================================================================
// LOGISTIC REGRESSION
// =============================================================================

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Binary logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per column, in layout order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Class labels in output order. Only `[0, 1]` is supported.
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

impl LogisticRegression {
    #[must_use]
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            classes: default_classes(),
        }
    }
}

/// Logistic function, computed without overflow for large `|z|`.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn decision_function(&self, row: &[f64]) -> Result<f64, ArtifactError> {
        if row.len() != self.coefficients.len() {
            return Err(ArtifactError::Dimension {
                what: "classifier input",
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }
        let dot: f64 = row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.intercept + dot)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ArtifactError> {
        let z = self.decision_function(row)?;
        Ok(ClassProbabilities::from_disease(sigmoid(z)))
    }

    fn predict(&self, row: &[f64]) -> Result<Diagnosis, ArtifactError> {
        let z = self.decision_function(row)?;
        Ok(if z > 0.0 {
            Diagnosis::Disease
        } else {
            Diagnosis::Healthy
        })
    }
}

// =============================================================================
// MODEL (tagged by kind)
// =============================================================================

/// The classifier stored in a model artifact, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    LogisticRegression(LogisticRegression),
}

impl Model {
    /// Display name of the model family.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "Logistic Regression",
        }
    }

    /// Check parameters against the expected column count.
    pub fn validate(&self, expected: usize) -> Result<(), ArtifactError> {
        match self {
            Self::LogisticRegression(lr) => {
                if lr.coefficients.len() != expected {
                    return Err(ArtifactError::Dimension {
                        what: "model coefficients",
                        expected,
                        actual: lr.coefficients.len(),
                    });
                }
                if lr.classes != default_classes() {
                    return Err(ArtifactError::InvalidParameter(format!(
                        "classes must be [0, 1], got {:?}",
                        lr.classes
                    )));
                }
                if !lr.intercept.is_finite() || lr.coefficients.iter().any(|w| !w.is_finite()) {
                    return Err(ArtifactError::InvalidParameter(
                        "model weights must be finite".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

impl Classifier for Model {
    fn width(&self) -> usize {
        match self {
            Self::LogisticRegression(lr) => lr.width(),
        }
    }

    fn decision_function(&self, row: &[f64]) -> Result<f64, ArtifactError> {
        match self {
            Self::LogisticRegression(lr) => lr.decision_function(row),
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ArtifactError> {
        match self {
            Self::LogisticRegression(lr) => lr.predict_proba(row),
        }
    }

    fn predict(&self, row: &[f64]) -> Result<Diagnosis, ArtifactError> {
        match self {
            Self::LogisticRegression(lr) => lr.predict(row),
        }
    }
}

// =============================================================================
// MODEL ARTIFACT
// =============================================================================

/// Descriptive metadata shown next to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_samples: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_risk_factors: Vec<String>,
}

/// The model file: expected feature order, classifier, metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub model: Model,
    #[serde(default)]
    pub info: ModelInfo,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn logistic_regression_probabilities() {
        let lr = LogisticRegression::new(vec![1.0, 0.0], 0.0);
        let proba = lr.predict_proba(&[2.0, 5.0]).unwrap();
        assert!((proba.disease - 0.880_797_077_977_882_3).abs() < 1e-12);
        assert!((proba.healthy + proba.disease - 1.0).abs() < 1e-12);
        assert_eq!(lr.predict(&[2.0, 5.0]).unwrap(), Diagnosis::Disease);
    }

    #[test]
    fn boundary_predicts_healthy() {
        let lr = LogisticRegression::new(vec![1.0], 0.0);
        assert_eq!(lr.predict(&[0.0]).unwrap(), Diagnosis::Healthy);
    }

    #[test]
    fn wrong_width_is_an_error() {
        let lr = LogisticRegression::new(vec![1.0, 2.0], 0.0);
        assert!(lr.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn model_json_is_tagged() {
        let json = r#"{"kind":"logistic_regression","coefficients":[0.5],"intercept":-1.0}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "Logistic Regression");
        assert_eq!(model.width(), 1);
        assert!(model.validate(1).is_ok());

        let json = r#"{"kind":"random_forest","trees":[]}"#;
        assert!(serde_json::from_str::<Model>(json).is_err());
    }

    #[test]
    fn validate_rejects_bad_classes() {
        let model = Model::LogisticRegression(LogisticRegression {
            classes: vec![1, 2],
            ..LogisticRegression::new(vec![0.0], 0.0)
        });
        assert!(matches!(
            model.validate(1),
            Err(ArtifactError::InvalidParameter(_))
        ));
    }
}
