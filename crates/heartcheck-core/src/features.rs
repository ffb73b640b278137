//! # Features
//!
//! The thirteen clinical feature names and the column layout an artifact
//! pair expects them in.
//!
//! Training pipelines are free to emit the columns in any order; the
//! [`FeatureLayout`] read from the model artifact records that order so a
//! [`crate::FeatureRecord`] can be reordered to match before scaling.

use crate::error::ArtifactError;
use std::fmt;
use std::str::FromStr;

/// Number of clinical features in a record.
pub const FEATURE_COUNT: usize = 13;

/// One clinical feature, named by its training-data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureName {
    Age,
    Sex,
    ChestPain,
    RestingBloodPressure,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    MajorVessels,
    Thalassemia,
}

impl FeatureName {
    /// All features, in canonical (form) order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Age,
        Self::Sex,
        Self::ChestPain,
        Self::RestingBloodPressure,
        Self::Cholesterol,
        Self::FastingBloodSugar,
        Self::RestingEcg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::StSlope,
        Self::MajorVessels,
        Self::Thalassemia,
    ];

    /// The column name used by the training data and the wire formats.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPain => "cp",
            Self::RestingBloodPressure => "trestbps",
            Self::Cholesterol => "chol",
            Self::FastingBloodSugar => "fbs",
            Self::RestingEcg => "restecg",
            Self::MaxHeartRate => "thalach",
            Self::ExerciseAngina => "exang",
            Self::StDepression => "oldpeak",
            Self::StSlope => "slope",
            Self::MajorVessels => "ca",
            Self::Thalassemia => "thal",
        }
    }

    /// Human readable label, as shown on the form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPain => "Chest Pain Type",
            Self::RestingBloodPressure => "Resting Blood Pressure (mm Hg)",
            Self::Cholesterol => "Cholesterol (mg/dl)",
            Self::FastingBloodSugar => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestingEcg => "Resting ECG",
            Self::MaxHeartRate => "Max Heart Rate Achieved",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::StDepression => "ST Depression",
            Self::StSlope => "Slope of Peak Exercise ST Segment",
            Self::MajorVessels => "Number of Major Vessels (0-3)",
            Self::Thalassemia => "Thalassemia",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ArtifactError::FeatureMismatch(format!("unknown feature '{s}'")))
    }
}

// =============================================================================
// FEATURE LAYOUT
// =============================================================================

/// The column order expected by a loaded scaler/model pair.
///
/// Always a permutation of [`FeatureName::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    order: [FeatureName; FEATURE_COUNT],
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FeatureLayout {
    /// The canonical order.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            order: FeatureName::ALL,
        }
    }

    /// Build a layout from column names, as stored in an artifact.
    ///
    /// Fails unless `names` mentions every feature exactly once.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ArtifactError> {
        if names.len() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureMismatch(format!(
                "expected {FEATURE_COUNT} feature names, got {}",
                names.len()
            )));
        }

        let mut order = FeatureName::ALL;
        let mut seen = [false; FEATURE_COUNT];
        for (slot, raw) in order.iter_mut().zip(names) {
            let name: FeatureName = raw.as_ref().parse()?;
            let index = name as usize;
            if seen[index] {
                return Err(ArtifactError::FeatureMismatch(format!(
                    "duplicate feature '{name}'"
                )));
            }
            seen[index] = true;
            *slot = name;
        }

        // Thirteen distinct known names out of thirteen: nothing is missing.
        Ok(Self { order })
    }

    /// The columns in expected order.
    #[must_use]
    pub fn names(&self) -> &[FeatureName] {
        &self.order
    }

    /// Column position of `name` in this layout.
    #[must_use]
    pub fn position(&self, name: FeatureName) -> Option<usize> {
        self.order.iter().position(|n| *n == name)
    }

    /// Column names as strings, in expected order.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.order.iter().map(|n| n.as_str().to_string()).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
