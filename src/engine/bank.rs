use ndarray::{Array2, ArrayView1, ArrayView2};

use super::classifiers::{GradientBoosting, KernelSvm, ProbabilisticClassifier, RandomForest};
use super::error::ModelError;
use crate::disease::BaseModelSpec;
use crate::models::ModelFamily;

/// A fitted first-stage learner.
#[derive(Debug)]
pub enum BaseModel {
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
    KernelSvm(KernelSvm),
}

impl BaseModel {
    pub fn fit(
        spec: &BaseModelSpec,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        Ok(match spec {
            BaseModelSpec::RandomForest(params) => Self::RandomForest(RandomForest::fit(params, x, y, seed)?),
            BaseModelSpec::GradientBoosting(params) => {
                Self::GradientBoosting(GradientBoosting::fit(params, x, y, seed)?)
            }
            BaseModelSpec::KernelSvm(params) => Self::KernelSvm(KernelSvm::fit(params, x, y, seed)?),
        })
    }

    fn inner(&self) -> &dyn ProbabilisticClassifier {
        match self {
            Self::RandomForest(model) => model,
            Self::GradientBoosting(model) => model,
            Self::KernelSvm(model) => model,
        }
    }
}

impl ProbabilisticClassifier for BaseModel {
    fn family(&self) -> ModelFamily {
        self.inner().family()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.inner().predict_probability(row)
    }
}

/// The ordered set of base learners for one disease. Column `j` of the
/// meta model's input is always model `j` of the bank.
#[derive(Debug)]
pub struct BaseModelBank {
    models: Vec<BaseModel>,
    n_features: usize,
}

impl BaseModelBank {
    /// Fit every planned model on the same (scaled) training set.
    pub fn fit(
        plan: &[BaseModelSpec],
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        if plan.is_empty() {
            return Err(ModelError::InvalidParameter("model plan is empty".into()));
        }
        let models = plan
            .iter()
            .map(|spec| {
                let model = BaseModel::fit(spec, x, y, seed)?;
                tracing::debug!(family = %model.family(), "base model fitted");
                Ok(model)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(Self {
            models,
            n_features: x.ncols(),
        })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn families(&self) -> Vec<ModelFamily> {
        self.models.iter().map(|m| m.family()).collect()
    }

    /// One probability per model, in plan order.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(self.models.iter().map(|m| m.predict_probability(row)).collect())
    }

    /// `n_rows x n_models` matrix of base probabilities, the meta model's
    /// training input.
    pub fn predict_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let mut out = Array2::zeros((x.nrows(), self.models.len()));
        for (j, model) in self.models.iter().enumerate() {
            out.column_mut(j).assign(&model.predict_probabilities(x));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifiers::{fixtures, BoostingParams, ForestParams, SvmParams};
    use ndarray::array;

    const PLAN: [BaseModelSpec; 3] = [
        BaseModelSpec::RandomForest(ForestParams::new(10, 4)),
        BaseModelSpec::GradientBoosting(BoostingParams::new(10, 0.1, 2)),
        BaseModelSpec::KernelSvm(SvmParams::new(1.0)),
    ];

    #[test]
    fn outputs_follow_plan_order() {
        let (x, y) = fixtures::blobs(120, 3, 5);
        let bank = BaseModelBank::fit(&PLAN, x.view(), y.view(), 42).unwrap();
        assert!(!bank.is_empty());
        assert_eq!(bank.len(), 3);
        assert_eq!(
            bank.families(),
            vec![ModelFamily::RandomForest, ModelFamily::GradientBoosting, ModelFamily::KernelSvm]
        );
        let probabilities = bank.predict(x.row(0)).unwrap();
        assert_eq!(probabilities.len(), 3);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));

        let matrix = bank.predict_matrix(x.view()).unwrap();
        assert_eq!(matrix.dim(), (120, 3));
        assert_eq!(matrix.row(0).to_vec(), probabilities);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let (x, y) = fixtures::blobs(60, 3, 5);
        let bank = BaseModelBank::fit(&PLAN[..1], x.view(), y.view(), 42).unwrap();
        assert_eq!(
            bank.predict(array![1.0, 2.0].view()),
            Err(ModelError::DimensionMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn empty_plan_is_rejected() {
        let (x, y) = fixtures::blobs(20, 2, 5);
        assert!(BaseModelBank::fit(&[], x.view(), y.view(), 42).is_err());
    }
}
