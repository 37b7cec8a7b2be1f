use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::binning::BinnedMatrix;
use super::tree::{RegressionTree, TreeParams, TreeSignal};
use super::{sigmoid, validate_training_set, ProbabilisticClassifier, MAX_SPLIT_THRESHOLDS};
use crate::engine::error::ModelError;
use crate::models::ModelFamily;

/// Boosted-tree ensemble settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Fraction of rows drawn (without replacement) for each stage.
    pub subsample: f64,
    pub min_samples_split: usize,
}

impl BoostingParams {
    pub const fn new(n_estimators: usize, learning_rate: f64, max_depth: usize) -> Self {
        Self {
            n_estimators,
            learning_rate,
            max_depth,
            subsample: 1.0,
            min_samples_split: 2,
        }
    }

    pub const fn with_subsample(mut self, subsample: f64) -> Self {
        self.subsample = subsample;
        self
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 || self.max_depth == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators and max_depth must be positive".into(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }
        Ok(())
    }
}

/// Gradient boosting on the binomial log-loss.
///
/// Starts from the prior log-odds; every stage fits a regression tree to the
/// residuals `y - p` and replaces its leaf values with the Newton step
/// `Σ(y - p) / Σ p(1 - p)`, scaled by the learning rate.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    initial_log_odds: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn fit(
        params: &BoostingParams,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        validate_training_set(x, y)?;

        let data = BinnedMatrix::new(x, MAX_SPLIT_THRESHOLDS);
        let n_rows = data.n_rows();
        let labels: Vec<f64> = y.iter().map(|&label| f64::from(label)).collect();

        let prior = labels.iter().sum::<f64>() / n_rows as f64;
        let initial_log_odds = (prior / (1.0 - prior)).ln();

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: 1,
            max_features: None,
        };
        let sample_size = ((params.subsample * n_rows as f64) as usize).clamp(1, n_rows);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut raw = vec![initial_log_odds; n_rows];
        let mut residuals = vec![0.0; n_rows];
        let mut curvature = vec![0.0; n_rows];
        let weights = vec![1.0; n_rows];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            for row in 0..n_rows {
                let p = sigmoid(raw[row]);
                residuals[row] = labels[row] - p;
                curvature[row] = p * (1.0 - p);
            }

            let rows = if sample_size < n_rows {
                let mut rows = index::sample(&mut rng, n_rows, sample_size).into_vec();
                rows.sort_unstable();
                rows
            } else {
                (0..n_rows).collect()
            };

            let signal = TreeSignal {
                targets: &residuals,
                weights: &weights,
                leaf_denominators: Some(&curvature),
            };
            let tree = RegressionTree::fit(&data, &signal, rows, tree_params, &mut rng);

            for (row, value) in raw.iter_mut().enumerate() {
                *value += params.learning_rate * tree.predict_binned(&data, row);
            }
            trees.push(tree);
        }

        if raw.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Diverged("boosting raw scores".into()));
        }

        Ok(Self {
            initial_log_odds,
            learning_rate: params.learning_rate,
            trees,
            n_features: x.ncols(),
        })
    }

    /// Additive log-odds score before the logistic link.
    pub fn decision_function(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.trees.iter().fold(self.initial_log_odds, |acc, tree| {
            acc + self.learning_rate * tree.predict(row)
        })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}

impl ProbabilisticClassifier for GradientBoosting {
    fn family(&self) -> ModelFamily {
        ModelFamily::GradientBoosting
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        sigmoid(self.decision_function(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifiers::fixtures;
    use ndarray::array;

    #[test]
    fn single_stage_starts_from_prior() {
        let (x, y) = fixtures::step(200, 9);
        let model = GradientBoosting::fit(&BoostingParams::new(1, 0.1, 1), x.view(), y.view(), 42).unwrap();
        let prior = y.iter().map(|&v| f64::from(v)).sum::<f64>() / 200.0;
        assert!((model.initial_log_odds - (prior / (1.0 - prior)).ln()).abs() < 1e-12);
        assert_eq!(model.n_estimators(), 1);
    }

    #[test]
    fn learns_step_function() {
        let (x, y) = fixtures::step(300, 2);
        let model = GradientBoosting::fit(&BoostingParams::new(60, 0.2, 2), x.view(), y.view(), 42).unwrap();
        let high = model.predict_probability(array![1.5, 0.0, 0.0].view());
        let low = model.predict_probability(array![-1.5, 0.0, 0.0].view());
        assert!(high > 0.9, "high side {high}");
        assert!(low < 0.1, "low side {low}");
    }

    #[test]
    fn subsampled_fit_is_reproducible() {
        let (x, y) = fixtures::blobs(200, 3, 4);
        let params = BoostingParams::new(20, 0.1, 3).with_subsample(0.8);
        let a = GradientBoosting::fit(&params, x.view(), y.view(), 42).unwrap();
        let b = GradientBoosting::fit(&params, x.view(), y.view(), 42).unwrap();
        let row = x.row(17);
        assert_eq!(a.predict_probability(row).to_bits(), b.predict_probability(row).to_bits());
    }

    #[test]
    fn rejects_out_of_range_subsample() {
        let (x, y) = fixtures::blobs(20, 2, 1);
        let params = BoostingParams::new(5, 0.1, 2).with_subsample(1.5);
        assert!(matches!(
            GradientBoosting::fit(&params, x.view(), y.view(), 42),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
