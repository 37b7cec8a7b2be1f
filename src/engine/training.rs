//! Per-disease training and inference pipeline.
//!
//! A pipeline moves `Untrained -> Training -> Ready` exactly once. Only a
//! `Ready` pipeline holds fitted state, and nothing mutates it afterwards.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use ndarray::Axis;
use serde::Serialize;

use super::bank::BaseModelBank;
use super::error::{ModelError, PredictionError};
use super::meta::MetaBlender;
use super::resolver;
use super::risk::classify_risk;
use super::scaler::StandardScaler;
use super::synthetic;
use crate::config::TrainingConfig;
use crate::disease::DiseaseSpec;
use crate::models::{DiseaseId, PredictionResult, ENSEMBLE_MODEL_LABEL};

/// Lifecycle of one disease's models during the startup build.
#[derive(Debug)]
pub enum PipelineState {
    Untrained,
    Training,
    Ready(Box<DiseasePipeline>),
}

impl PipelineState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Untrained => "untrained",
            Self::Training => "training",
            Self::Ready(_) => "ready",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Run the whole fit for `spec`, passing through `Training`.
    /// Only an `Untrained` slot can be trained.
    pub fn train(&mut self, spec: &'static DiseaseSpec, config: &TrainingConfig) -> Result<(), ModelError> {
        if !matches!(self, Self::Untrained) {
            return Err(ModelError::InvalidParameter(format!(
                "{} pipeline is already {}",
                spec.id,
                self.label()
            )));
        }
        self.advance(spec.id, Self::Training);
        match DiseasePipeline::fit(spec, config) {
            Ok(pipeline) => {
                self.advance(spec.id, Self::Ready(Box::new(pipeline)));
                Ok(())
            }
            Err(e) => {
                // A failed fit leaves nothing half-trained behind.
                self.advance(spec.id, Self::Untrained);
                Err(e)
            }
        }
    }

    pub fn into_ready(self) -> Option<DiseasePipeline> {
        match self {
            Self::Ready(pipeline) => Some(*pipeline),
            _ => None,
        }
    }

    fn advance(&mut self, disease: DiseaseId, next: Self) {
        tracing::debug!(%disease, from = self.label(), to = next.label(), "pipeline state");
        *self = next;
    }
}

/// Outcome of training one disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub disease: DiseaseId,
    pub samples: usize,
    pub positive_rate: f64,
    /// In-sample accuracy of the full ensemble at the 0.5 cut.
    pub accuracy: f64,
    pub elapsed_ms: u64,
}

/// Fitted scaler, base models and meta model for one disease.
#[derive(Debug)]
pub struct DiseasePipeline {
    spec: &'static DiseaseSpec,
    scaler: StandardScaler,
    bank: BaseModelBank,
    meta: MetaBlender,
    summary: TrainingSummary,
}

impl DiseasePipeline {
    /// Generate the synthetic set, then fit scaler, base models and meta
    /// model in that order. The meta model learns from the base models'
    /// in-sample probabilities.
    pub fn fit(spec: &'static DiseaseSpec, config: &TrainingConfig) -> Result<Self, ModelError> {
        let start = Instant::now();
        tracing::info!(disease = %spec.id, samples = config.n_samples, "Training disease models");

        let data = synthetic::generate(spec, config.n_samples, config.seed)?;
        let (scaler, scaled) = StandardScaler::fit_transform(data.features.view())?;
        let bank = BaseModelBank::fit(spec.base_models, scaled.view(), data.labels.view(), config.seed)?;
        let base_probabilities = bank.predict_matrix(scaled.view())?;
        let meta = MetaBlender::fit(
            &spec.meta_model,
            base_probabilities.view(),
            data.labels.view(),
            config.seed,
        )?;

        let correct = base_probabilities
            .axis_iter(Axis(0))
            .zip(data.labels.iter())
            .map(|(row, &label)| {
                let p = meta.predict_probability(row.to_vec().as_slice())?;
                Ok(u8::from(p >= 0.5) == label)
            })
            .collect::<Result<Vec<bool>, ModelError>>()?
            .into_iter()
            .filter(|&hit| hit)
            .count();

        let summary = TrainingSummary {
            disease: spec.id,
            samples: data.n_samples(),
            positive_rate: data.positive_rate(),
            accuracy: correct as f64 / data.n_samples() as f64,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            disease = %spec.id,
            samples = summary.samples,
            positive_rate = summary.positive_rate,
            accuracy = summary.accuracy,
            elapsed_ms = summary.elapsed_ms,
            "Disease models ready"
        );

        Ok(Self {
            spec,
            scaler,
            bank,
            meta,
            summary,
        })
    }

    pub fn spec(&self) -> &'static DiseaseSpec {
        self.spec
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    pub fn bank(&self) -> &BaseModelBank {
        &self.bank
    }

    pub fn meta(&self) -> &MetaBlender {
        &self.meta
    }

    /// Final ensemble probability of the positive class.
    pub fn probability(&self, parameters: &HashMap<String, f64>) -> Result<f64, PredictionError> {
        let features = resolver::resolve(self.spec, parameters)?;
        let scaled = self.scaler.transform_row(features.view())?;
        let base = self.bank.predict(scaled.view())?;
        Ok(self.meta.predict_probability(&base)?)
    }

    pub fn predict(&self, parameters: &HashMap<String, f64>) -> Result<PredictionResult, PredictionError> {
        let probability = self.probability(parameters)?;
        let (prediction, confidence, risk_level) =
            classify_risk(probability, self.spec.confidence_threshold);
        tracing::debug!(
            disease = %self.spec.id,
            probability,
            risk_level = %risk_level,
            "prediction"
        );

        Ok(PredictionResult {
            prediction,
            confidence,
            risk_level,
            feature_importance: self.feature_importance(),
            model_used: ENSEMBLE_MODEL_LABEL.to_string(),
        })
    }

    fn feature_importance(&self) -> BTreeMap<String, f64> {
        self.spec
            .importance
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease;
    use crate::engine::test_support::BROKEN_SPECS;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            seed: 42,
            n_samples: 1_000,
        }
    }

    #[test]
    fn state_moves_to_ready() {
        let mut state = PipelineState::Untrained;
        assert_eq!(state.label(), "untrained");
        state.train(disease::spec(DiseaseId::Heart), &small_config()).unwrap();
        assert!(state.is_ready());
        let pipeline = state.into_ready().unwrap();
        assert_eq!(pipeline.summary().disease, DiseaseId::Heart);
        assert_eq!(pipeline.summary().samples, 1_000);
        assert_eq!(pipeline.bank().len(), disease::spec(DiseaseId::Heart).base_models.len());
    }

    #[test]
    fn ready_pipeline_cannot_be_retrained() {
        let spec = disease::spec(DiseaseId::Hypertension);
        let mut state = PipelineState::Untrained;
        state.train(spec, &small_config()).unwrap();
        assert!(state.train(spec, &small_config()).is_err());
        assert!(state.is_ready());
    }

    #[test]
    fn failed_fit_returns_to_untrained() {
        let [empty_plan, ghost_rule] = &BROKEN_SPECS;

        let mut state = PipelineState::Untrained;
        let err = state.train(empty_plan, &small_config()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter(_)), "{err:?}");
        assert!(!state.is_ready());
        assert_eq!(state.label(), "untrained");

        let err = state.train(ghost_rule, &small_config()).unwrap_err();
        assert_eq!(err, ModelError::UnknownFeature("not_a_column".into()));
        assert!(!state.is_ready());
        assert!(state.into_ready().is_none());
    }

    #[test]
    fn training_fits_the_data() {
        let spec = disease::spec(DiseaseId::Stroke);
        let pipeline = DiseasePipeline::fit(spec, &small_config()).unwrap();
        let summary = pipeline.summary();
        assert!(summary.accuracy > 0.7, "accuracy {}", summary.accuracy);
        assert!(summary.positive_rate > 0.0 && summary.positive_rate < 1.0);
        assert_eq!(pipeline.meta().n_inputs(), spec.base_models.len());
    }

    #[test]
    fn importance_uses_catalog_weights() {
        let spec = disease::spec(DiseaseId::Diabetes);
        let pipeline = DiseasePipeline::fit(spec, &small_config()).unwrap();
        let result = pipeline.predict(&HashMap::new()).unwrap();
        assert_eq!(result.feature_importance.len(), spec.importance.len());
        for (name, weight) in spec.importance {
            assert_eq!(result.feature_importance[*name], *weight);
        }
        assert_eq!(result.model_used, "ensemble");
    }
}
