//! # Artifact Module
//!
//! Formats for the externally trained scaler/model pair.
//!
//! This module contains:
//! - Standard scaler (`transform`)
//! - Classifiers (`predict_proba`, `predict`)
//! - Loading both files from disk
//!
//! Training happens elsewhere. Anything that can write these JSON
//! documents can produce an artifact pair.

mod loader;
mod model;
mod scaler;

pub use loader::*;
pub use model::*;
pub use scaler::*;
