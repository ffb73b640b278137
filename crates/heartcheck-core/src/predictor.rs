//! # Predictor
//!
//! Transform-then-predict over a loaded artifact pair.
//!
//! A `Predictor` only exists once both artifacts have been read and their
//! shapes checked against the thirteen features, so `predict` never sees a
//! layout it cannot satisfy.

use crate::artifact::{ArtifactPaths, Classifier, Model, ModelArtifact, ModelInfo, StandardScaler};
use crate::error::ArtifactError;
use crate::features::{FEATURE_COUNT, FeatureLayout};
use crate::prediction::{ClassProbabilities, Prediction};
use crate::record::FeatureRecord;

/// A loaded, validated scaler/model pair.
#[derive(Debug, Clone)]
pub struct Predictor {
    layout: FeatureLayout,
    scaler: StandardScaler,
    model: Model,
    info: ModelInfo,
}

impl Predictor {
    /// Build from parsed artifacts, checking that all shapes agree.
    pub fn new(artifact: ModelArtifact, scaler: StandardScaler) -> Result<Self, ArtifactError> {
        let layout = FeatureLayout::from_names(&artifact.feature_names)?;

        if let Some(names) = &scaler.feature_names
            && *names != artifact.feature_names
        {
            return Err(ArtifactError::FeatureMismatch(format!(
                "scaler columns {names:?} differ from model columns {:?}",
                artifact.feature_names
            )));
        }
        scaler.validate(FEATURE_COUNT)?;
        artifact.model.validate(FEATURE_COUNT)?;

        Ok(Self {
            layout,
            scaler,
            model: artifact.model,
            info: artifact.info,
        })
    }

    /// Read both artifact files and build a predictor.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let (artifact, scaler) = paths.read()?;
        Self::new(artifact, scaler)
    }

    /// The column order the artifacts expect.
    #[must_use]
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Metadata shipped with the model.
    #[must_use]
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Display name of the model family.
    #[must_use]
    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    /// Reorder, scale, and classify one record.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, ArtifactError> {
        let row = record.reorder(&self.layout);
        let scaled = self.scaler.transform(&row)?;
        let z = self.model.decision_function(&scaled)?;
        if !z.is_finite() {
            return Err(ArtifactError::InvalidParameter(format!(
                "decision value is not finite ({z})"
            )));
        }
        let diagnosis = self.model.predict(&scaled)?;
        let probabilities: ClassProbabilities = self.model.predict_proba(&scaled)?;
        Ok(Prediction::new(diagnosis, probabilities))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::artifact::LogisticRegression;
    use crate::features::FeatureName;
    use crate::prediction::{Diagnosis, RiskTier};

    /// Only age matters: z = (age - 50) / 10.
    fn age_only(layout: &FeatureLayout) -> Predictor {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut scale = vec![1.0; FEATURE_COUNT];
        let age = layout.position(FeatureName::Age).unwrap();
        coefficients[age] = 1.0;
        mean[age] = 50.0;
        scale[age] = 10.0;

        let artifact = ModelArtifact {
            feature_names: layout.to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(coefficients, 0.0)),
            info: ModelInfo::default(),
        };
        Predictor::new(artifact, StandardScaler::new(mean, scale)).unwrap()
    }

    fn record_with_age(age: u8) -> FeatureRecord {
        FeatureRecord {
            age,
            ..FeatureRecord::default()
        }
    }

    #[test]
    fn high_risk_record() {
        let predictor = age_only(&FeatureLayout::canonical());
        let prediction = predictor.predict(&record_with_age(70)).unwrap();

        assert_eq!(prediction.diagnosis, Diagnosis::Disease);
        assert_eq!(prediction.risk, RiskTier::High);
        assert!((prediction.probabilities.disease - 0.880_797_077_977_882_3).abs() < 1e-9);
    }

    #[test]
    fn medium_risk_record() {
        let predictor = age_only(&FeatureLayout::canonical());
        let prediction = predictor.predict(&record_with_age(54)).unwrap();

        // z = 0.4
        assert_eq!(prediction.diagnosis, Diagnosis::Disease);
        assert_eq!(prediction.risk, RiskTier::Medium);
    }

    #[test]
    fn decision_boundary_is_healthy_but_medium() {
        let predictor = age_only(&FeatureLayout::canonical());
        let prediction = predictor.predict(&record_with_age(50)).unwrap();

        assert_eq!(prediction.diagnosis, Diagnosis::Healthy);
        assert_eq!(prediction.risk, RiskTier::Medium);
        assert_eq!(prediction.confidence_percent(), "50.0%");
    }

    #[test]
    fn low_risk_record() {
        let predictor = age_only(&FeatureLayout::canonical());
        let prediction = predictor.predict(&record_with_age(30)).unwrap();

        assert_eq!(prediction.diagnosis, Diagnosis::Healthy);
        assert_eq!(prediction.risk, RiskTier::Low);
        assert!((prediction.confidence - 0.880_797_077_977_882_3).abs() < 1e-9);
    }

    #[test]
    fn permuted_layout_gives_same_prediction() {
        let mut names = FeatureLayout::canonical().to_strings();
        names.rotate_left(5);
        let layout = FeatureLayout::from_names(&names).unwrap();

        let canonical = age_only(&FeatureLayout::canonical());
        let permuted = age_only(&layout);
        let record = record_with_age(63);

        assert_eq!(
            canonical.predict(&record).unwrap(),
            permuted.predict(&record).unwrap()
        );
    }

    #[test]
    fn scaler_columns_must_match_model() {
        let layout = FeatureLayout::canonical();
        let artifact = ModelArtifact {
            feature_names: layout.to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(vec![0.0; 13], 0.0)),
            info: ModelInfo::default(),
        };
        let mut reversed = layout.to_strings();
        reversed.reverse();
        let scaler = StandardScaler {
            feature_names: Some(reversed),
            ..StandardScaler::new(vec![0.0; 13], vec![1.0; 13])
        };

        let err = Predictor::new(artifact, scaler).unwrap_err();
        assert!(matches!(err, ArtifactError::FeatureMismatch(_)));
    }

    #[test]
    fn coefficient_count_must_match() {
        let artifact = ModelArtifact {
            feature_names: FeatureLayout::canonical().to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(vec![0.0; 12], 0.0)),
            info: ModelInfo::default(),
        };
        let err = Predictor::new(artifact, StandardScaler::new(vec![0.0; 13], vec![1.0; 13]))
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Dimension {
                what: "model coefficients",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_decision_value_is_an_error() {
        // Finite but huge weights on opposite signs overflow to inf - inf.
        let layout = FeatureLayout::canonical();
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[layout.position(FeatureName::RestingBloodPressure).unwrap()] = -1e308;
        coefficients[layout.position(FeatureName::Cholesterol).unwrap()] = 1e308;
        let artifact = ModelArtifact {
            feature_names: layout.to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(coefficients, 0.0)),
            info: ModelInfo::default(),
        };
        let predictor = Predictor::new(
            artifact,
            StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]),
        )
        .unwrap();

        let err = predictor.predict(&FeatureRecord::default()).unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidParameter(_)));
    }

    #[test]
    fn subnormal_scale_is_rejected_at_load() {
        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[0] = 1e-310;
        let artifact = ModelArtifact {
            feature_names: FeatureLayout::canonical().to_strings(),
            model: Model::LogisticRegression(LogisticRegression::new(vec![0.0; 13], 5.0)),
            info: ModelInfo::default(),
        };
        let err = Predictor::new(artifact, StandardScaler::new(vec![0.0; 13], scale))
            .unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidParameter(_)));
    }
}
