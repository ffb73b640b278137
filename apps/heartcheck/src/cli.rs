//! # CLI Commands
//!
//! Implementations behind the `heartcheck` subcommands.
//!
//! Every command loads the artifact pair first. A missing artifact stops
//! the command before anything else happens, in particular before the
//! server binds or any page is rendered.

use crate::api;
use heartcheck_core::{ArtifactError, ArtifactPaths, FeatureRecord, Prediction, Predictor};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Message shown when an artifact file is missing.
pub const MODEL_NOT_FOUND: &str =
    "Model not found. Please run the training pipeline to generate the required model files.";

/// Exit code for a missing artifact.
pub const EXIT_MODEL_NOT_FOUND: u8 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The artifact pair could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file does not hold a valid record.
    #[error("invalid record in {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The server could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// True when the failure is a missing artifact file.
    #[must_use]
    pub fn is_model_missing(&self) -> bool {
        matches!(self, Self::Artifact(err) if err.is_missing())
    }

    /// The line shown to the user on stderr.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_model_missing() {
            MODEL_NOT_FOUND.to_string()
        } else {
            format!("error: {self}")
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_model_missing() {
            EXIT_MODEL_NOT_FOUND
        } else {
            EXIT_FAILURE
        }
    }
}

// =============================================================================
// ARTIFACTS
// =============================================================================

/// Load and validate the artifact pair.
pub fn load_predictor(paths: &ArtifactPaths) -> Result<Predictor, CliError> {
    info!(
        model = %paths.model.display(),
        scaler = %paths.scaler.display(),
        "loading artifacts"
    );
    let predictor = Predictor::load(paths)?;
    info!(
        kind = predictor.model_kind(),
        features = predictor.layout().names().len(),
        "artifacts loaded"
    );
    Ok(predictor)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Load the artifacts, then serve the form until Ctrl+C.
pub async fn cmd_serve(paths: &ArtifactPaths, bind: &str) -> Result<(), CliError> {
    let predictor = Arc::new(load_predictor(paths)?);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|source| CliError::Bind {
            addr: bind.to_string(),
            source,
        })?;
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| bind.to_string());
    info!(%addr, "serving heart disease prediction form");

    axum::serve(listener, api::router(predictor))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// PREDICT COMMAND
// =============================================================================

/// Read one record from a JSON file.
pub fn read_record(path: &Path) -> Result<FeatureRecord, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

/// Score the record stored in `input`.
pub fn predict_file(
    paths: &ArtifactPaths,
    input: &Path,
) -> Result<(FeatureRecord, Prediction), CliError> {
    let predictor = load_predictor(paths)?;
    let record = read_record(input)?;
    let prediction = predictor.predict(&record)?;
    Ok((record, prediction))
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    input: &'a FeatureRecord,
    #[serde(flatten)]
    prediction: &'a Prediction,
}

/// Score one record and print the outcome.
pub fn cmd_predict(paths: &ArtifactPaths, input: &Path, json: bool) -> Result<(), CliError> {
    let (record, prediction) = predict_file(paths, input)?;

    if json {
        let output = PredictOutput {
            input: &record,
            prediction: &prediction,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", prediction.to_text());
        println!("Input Summary:");
        for (column, value) in record.summary() {
            println!("  {column:<9} {value}");
        }
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

#[derive(Serialize)]
struct CheckOutput<'a> {
    model: String,
    scaler: String,
    kind: &'a str,
    name: Option<&'a str>,
    training_samples: Option<u64>,
    feature_names: Vec<String>,
}

/// Validate the artifact pair and print a summary.
pub fn cmd_check(paths: &ArtifactPaths, json: bool) -> Result<(), CliError> {
    let predictor = load_predictor(paths)?;
    let info = predictor.info();
    let output = CheckOutput {
        model: paths.model.display().to_string(),
        scaler: paths.scaler.display().to_string(),
        kind: predictor.model_kind(),
        name: info.name.as_deref(),
        training_samples: info.training_samples,
        feature_names: predictor.layout().to_strings(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Artifacts OK");
        println!("  Model:    {}", output.model);
        println!("  Scaler:   {}", output.scaler);
        println!("  Kind:     {}", output.name.unwrap_or(output.kind));
        if let Some(samples) = output.training_samples {
            println!("  Trained:  {samples} patients");
        }
        println!("  Features: {}", output.feature_names.join(", "));
    }
    Ok(())
}
