//! Error types for the prediction engine.
//!
//! Three layers: `ModelError` for fitting/scoring internals,
//! `PredictionError` for per-request failures, `TrainingError` for the
//! startup build that must succeed before anything is served.

use thiserror::Error;

use crate::models::DiseaseId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyDataset,

    #[error("Feature matrix has {rows} rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Training labels contain a single class ({0})")]
    SingleClass(u8),

    #[error("Label {0} is not binary")]
    InvalidLabel(u8),

    #[error("Non-finite value in column {column}")]
    NonFiniteInput { column: usize },

    #[error("Invalid hyperparameter: {0}")]
    InvalidParameter(String),

    #[error("Solver did not produce finite coefficients: {0}")]
    Diverged(String),

    #[error("Solver failed: {0}")]
    Solver(String),

    #[error("Unknown feature in label rule: {0}")]
    UnknownFeature(String),
}

/// Per-request failures. Both caller-input variants are client errors:
/// never retried, never reported as system faults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Unknown disease type: {0}")]
    UnknownDisease(String),

    #[error("Parameter '{name}' is not a finite number: {value}")]
    MalformedParameter { name: String, value: String },

    #[error("Missing required parameters: {0:?}")]
    MissingParameters(Vec<String>),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl PredictionError {
    /// True for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Model(_))
    }
}

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Invalid training configuration: {0}")]
    Config(String),

    #[error("Training failed for {disease}: {source}")]
    Failed {
        disease: DiseaseId,
        #[source]
        source: ModelError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_flagged() {
        assert!(PredictionError::UnknownDisease("x".into()).is_client_error());
        assert!(PredictionError::MalformedParameter {
            name: "glucose".into(),
            value: "NaN".into()
        }
        .is_client_error());
        assert!(PredictionError::MissingParameters(vec!["age".into()]).is_client_error());
        assert!(!PredictionError::Model(ModelError::EmptyDataset).is_client_error());
    }

    #[test]
    fn messages_name_the_offending_input() {
        let err = PredictionError::UnknownDisease("not_a_disease".into());
        assert_eq!(err.to_string(), "Unknown disease type: not_a_disease");

        let err = PredictionError::MissingParameters(vec!["glucose".into(), "bmi".into()]);
        assert_eq!(err.to_string(), "Missing required parameters: [\"glucose\", \"bmi\"]");
    }

    #[test]
    fn training_failure_keeps_source() {
        use std::error::Error;
        let err = TrainingError::Failed {
            disease: DiseaseId::Heart,
            source: ModelError::SingleClass(0),
        };
        assert!(err.to_string().contains("heart"));
        assert!(err.source().is_some());
    }
}
