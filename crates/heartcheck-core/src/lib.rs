//! # HeartCheck Core
//!
//! The prediction pipeline behind the HeartCheck form.
//!
//! ```text
//! FeatureRecord ──reorder──► [f64; 13] ──StandardScaler──► scaled ──Classifier──► Prediction
//!                 (layout)                 (transform)                (predict_proba)
//! ```
//!
//! The scaler/classifier pair is trained elsewhere and shipped as two JSON
//! artifacts. This crate loads them, checks that their shapes agree with
//! the thirteen clinical features, and turns a [`FeatureRecord`] into a
//! [`Prediction`].
//!
//! No async, no network. File I/O is limited to reading the artifacts.

pub mod artifact;
pub mod error;
pub mod features;
pub mod prediction;
pub mod predictor;
pub mod record;

pub use artifact::{
    ArtifactPaths, Classifier, LogisticRegression, Model, ModelArtifact, ModelInfo,
    StandardScaler,
};
pub use error::{ArtifactError, RecordError};
pub use features::{FEATURE_COUNT, FeatureLayout, FeatureName};
pub use prediction::{ClassProbabilities, Diagnosis, Prediction, RiskTier};
pub use predictor::Predictor;
pub use record::{
    ChestPain, CodedRecord, FeatureRecord, RawRecord, RestingEcg, Sex, StSlope, Thalassemia,
};
