//! medpredict CLI entry point.

use std::collections::HashMap;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use medpredict_lib::config::TrainingConfig;
use medpredict_lib::disease;
use medpredict_lib::engine::{missing_required, ParameterMap};
use medpredict_lib::{DiseaseId, ModelRegistry, PredictionError, TrainingError};

#[derive(Parser)]
#[command(name = "medpredict")]
#[command(about = "Disease risk prediction with stacked classifier ensembles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported diseases with their parameters
    Diseases,

    /// Show the curated input parameters of one disease
    Features {
        /// Disease identifier, e.g. diabetes
        disease: String,
    },

    /// Train the models and score one set of parameters
    Predict {
        /// Disease identifier, e.g. diabetes
        disease: String,

        /// Parameter as name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Parameters as a JSON object; --param values take precedence
        #[arg(long)]
        json: Option<String>,

        /// Reject requests missing any required parameter
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error("Invalid JSON parameters: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Prediction(e) if e.is_client_error() => 2,
            Self::Json(_) => 2,
            Self::Prediction(_) | Self::Training(_) => 1,
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    medpredict_lib::init_tracing();

    let result = match cli.command {
        Commands::Diseases => diseases_command(),
        Commands::Features { disease } => features_command(&disease),
        Commands::Predict {
            disease,
            params,
            json,
            strict,
        } => predict_command(&disease, params, json.as_deref(), strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn lookup(raw: &str) -> Result<DiseaseId, CliError> {
    DiseaseId::parse(raw).map_err(|_| PredictionError::UnknownDisease(raw.to_string()).into())
}

fn diseases_command() -> Result<(), CliError> {
    let diseases: Vec<_> = disease::all().iter().map(|spec| spec.info()).collect();
    print_json(&diseases)
}

fn features_command(raw: &str) -> Result<(), CliError> {
    let id = lookup(raw)?;
    print_json(&disease::spec(id).info())
}

fn predict_command(
    raw: &str,
    params: Vec<(String, f64)>,
    json: Option<&str>,
    strict: bool,
) -> Result<(), CliError> {
    // Validate the request before paying for training.
    let id = lookup(raw)?;

    let mut parameters: HashMap<String, f64> = match json {
        Some(text) => ParameterMap::from_json(&serde_json::from_str(text)?)?.into_inner(),
        None => HashMap::new(),
    };
    parameters.extend(params);

    if strict {
        let missing = missing_required(disease::spec(id), &parameters);
        if !missing.is_empty() {
            return Err(PredictionError::MissingParameters(missing).into());
        }
    }

    let registry = ModelRegistry::train(TrainingConfig::from_env()?)?;
    let result = registry.predict(id.as_str(), &parameters)?;
    print_json(&result)
}
