use ndarray::{ArrayView1, ArrayView2};

use super::classifiers::{GradientBoosting, LogisticRegression, ProbabilisticClassifier};
use super::error::ModelError;
use crate::disease::MetaModelSpec;
use crate::models::ModelFamily;

/// Second-stage learner mapping the vector of base probabilities to the
/// final ensemble probability.
#[derive(Debug)]
pub enum MetaBlender {
    Logistic(LogisticRegression),
    Boosted(GradientBoosting),
}

impl MetaBlender {
    /// Fit on the base models' probabilities (`n_rows x n_base_models`).
    pub fn fit(
        spec: &MetaModelSpec,
        base_probabilities: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        Ok(match spec {
            MetaModelSpec::Logistic(params) => {
                Self::Logistic(LogisticRegression::fit(params, base_probabilities, y)?)
            }
            MetaModelSpec::Boosted(params) => {
                Self::Boosted(GradientBoosting::fit(params, base_probabilities, y, seed)?)
            }
        })
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            Self::Logistic(model) => model.family(),
            Self::Boosted(model) => model.family(),
        }
    }

    pub fn n_inputs(&self) -> usize {
        match self {
            Self::Logistic(model) => model.n_features(),
            Self::Boosted(model) => model.n_features(),
        }
    }

    pub fn predict_probability(&self, base_probabilities: &[f64]) -> Result<f64, ModelError> {
        if base_probabilities.len() != self.n_inputs() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_inputs(),
                actual: base_probabilities.len(),
            });
        }
        let row = ArrayView1::from(base_probabilities);
        Ok(match self {
            Self::Logistic(model) => model.predict_probability(row),
            Self::Boosted(model) => model.predict_probability(row),
        })
    }
}
