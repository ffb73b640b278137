//! # HeartCheck
//!
//! Heart disease risk form backed by an externally trained classifier.
//!
//! ```text
//! heartcheck serve   [--bind ADDR] [--model PATH] [--scaler PATH]
//! heartcheck predict --input RECORD.json [--json]
//! heartcheck check   [--json]
//! ```

use clap::{Args, Parser, Subcommand};
use heartcheck::cli::{self, CliError};
use heartcheck::heartcheck_core::ArtifactPaths;
use heartcheck::heartcheck_core::artifact::{DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "heartcheck",
    about = "Heart disease risk prediction form",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Locations of the scaler/model pair.
#[derive(Args, Debug)]
struct ArtifactArgs {
    /// Model artifact (feature names + classifier)
    #[arg(long, env = "HEARTCHECK_MODEL", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Fitted scaler artifact
    #[arg(long, env = "HEARTCHECK_SCALER", default_value = DEFAULT_SCALER_PATH)]
    scaler: PathBuf,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model, &self.scaler)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the prediction form over HTTP
    Serve {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Address to listen on
        #[arg(long, env = "HEARTCHECK_BIND", default_value = "127.0.0.1:8501")]
        bind: String,
    },
    /// Predict from a JSON record file
    Predict {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// JSON file with the thirteen clinical fields
        #[arg(long)]
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load and validate the artifacts
    Check {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Serve { artifacts, bind } => cli::cmd_serve(&artifacts.paths(), &bind).await,
        Commands::Predict {
            artifacts,
            input,
            json,
        } => cli::cmd_predict(&artifacts.paths(), &input, json),
        Commands::Check { artifacts, json } => cli::cmd_check(&artifacts.paths(), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &CliError) -> ExitCode {
    if err.is_model_missing() {
        error!(error = %err, "artifact missing");
    } else {
        error!(error = %err, "command failed");
    }
    eprintln!("{}", err.user_message());
    ExitCode::from(err.exit_code())
}
