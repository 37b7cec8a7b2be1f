use std::collections::HashMap;

use super::error::{ModelError, PredictionError, TrainingError};
use super::training::{DiseasePipeline, PipelineState, TrainingSummary};
use crate::config::TrainingConfig;
use crate::disease::{self, DiseaseInfo, DiseaseSpec};
use crate::models::{DiseaseId, PredictionResult};

/// Trained models for every supported disease.
///
/// Built once by [`ModelRegistry::train`] and read-only afterwards, so a
/// single instance can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct ModelRegistry {
    /// Indexed by `DiseaseId as usize`, catalog order.
    pipelines: Vec<DiseasePipeline>,
    config: TrainingConfig,
}

impl ModelRegistry {
    /// Train every disease in catalog order. Any failure aborts the whole
    /// build; a registry is never partially available.
    pub fn train(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        tracing::info!(seed = config.seed, samples = config.n_samples, "Training disease models");

        let pipelines = train_pipelines(disease::all(), &config)?;

        tracing::info!(diseases = pipelines.len(), "All disease models ready");
        Ok(Self { pipelines, config })
    }

    /// Score `parameters` for `disease_id`. The identifier is matched
    /// case-insensitively; unknown identifiers are rejected before any model
    /// runs. Missing parameters take the disease's defaults.
    pub fn predict(
        &self,
        disease_id: &str,
        parameters: &HashMap<String, f64>,
    ) -> Result<PredictionResult, PredictionError> {
        let pipeline = self.pipeline(parse_disease(disease_id)?);
        pipeline.predict(parameters).inspect_err(|e| {
            if e.is_client_error() {
                tracing::debug!(disease = disease_id, error = %e, "Rejected prediction input");
            } else {
                tracing::warn!(disease = disease_id, error = %e, "Prediction failed");
            }
        })
    }

    /// The curated input names published for `disease_id`, in a stable order.
    pub fn feature_requirements(&self, disease_id: &str) -> Result<Vec<&'static str>, PredictionError> {
        let id = parse_disease(disease_id)?;
        Ok(disease::spec(id).required.to_vec())
    }

    pub fn supported_diseases(&self) -> Vec<DiseaseInfo> {
        disease::all().iter().map(|spec| spec.info()).collect()
    }

    pub fn summaries(&self) -> Vec<&TrainingSummary> {
        self.pipelines.iter().map(|p| p.summary()).collect()
    }

    pub fn pipeline(&self, id: DiseaseId) -> &DiseasePipeline {
        &self.pipelines[id as usize]
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}

/// Fit one pipeline per spec, in slice order, stopping at the first failure.
fn train_pipelines(
    specs: &'static [DiseaseSpec],
    config: &TrainingConfig,
) -> Result<Vec<DiseasePipeline>, TrainingError> {
    let mut pipelines = Vec::with_capacity(specs.len());
    for spec in specs {
        let mut state = PipelineState::Untrained;
        if let Err(source) = state.train(spec, config) {
            tracing::error!(disease = %spec.id, error = %source, "Training failed");
            return Err(TrainingError::Failed {
                disease: spec.id,
                source,
            });
        }
        let pipeline = state.into_ready().ok_or_else(|| TrainingError::Failed {
            disease: spec.id,
            source: ModelError::InvalidParameter("pipeline not ready".into()),
        })?;
        pipelines.push(pipeline);
    }
    Ok(pipelines)
}

fn parse_disease(raw: &str) -> Result<DiseaseId, PredictionError> {
    DiseaseId::parse(raw).map_err(|_| {
        tracing::debug!(disease = raw, "Unknown disease requested");
        PredictionError::UnknownDisease(raw.to_string())
    })
}
