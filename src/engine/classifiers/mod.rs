//! First- and second-stage learners.
//!
//! Every learner is built by an associated `fit` that consumes a training
//! matrix and returns an immutable fitted model; a fitted model cannot be
//! refit. Scoring goes through [`ProbabilisticClassifier`].

mod binning;
mod boosting;
mod forest;
mod logistic;
mod svm;
mod tree;

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::engine::error::ModelError;
use crate::models::ModelFamily;

pub use boosting::{BoostingParams, GradientBoosting};
pub use forest::{ForestParams, RandomForest};
pub use logistic::{LogisticParams, LogisticRegression};
pub use svm::{KernelSvm, SvmParams};

/// Upper bound on split candidates per feature for the tree learners.
pub const MAX_SPLIT_THRESHOLDS: usize = 255;

/// A fitted binary classifier that scores one row at a time.
pub trait ProbabilisticClassifier: Send + Sync {
    fn family(&self) -> ModelFamily;

    /// Input width the model was fitted on.
    fn n_features(&self) -> usize;

    /// Probability of the positive class for one (already scaled) row.
    /// The row must have `n_features()` entries.
    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Score every row of `x`.
    fn predict_probabilities(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_probability(row))
            .collect()
    }
}

/// Logistic function, written to stay finite for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Shared input checks for every `fit`: non-empty, matching lengths,
/// finite values, 0/1 labels with both classes present.
pub(crate) fn validate_training_set(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, u8>,
) -> Result<(), ModelError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ModelError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LabelCountMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    for (column, values) in x.columns().into_iter().enumerate() {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteInput { column });
        }
    }
    if let Some(bad) = y.iter().find(|&&label| label > 1) {
        return Err(ModelError::InvalidLabel(*bad));
    }
    let positives = y.iter().filter(|&&label| label == 1).count();
    if positives == 0 {
        return Err(ModelError::SingleClass(0));
    }
    if positives == y.len() {
        return Err(ModelError::SingleClass(1));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two noisy Gaussian blobs: class 1 centred at +1 on every axis,
    /// class 0 at -1. Linearly separable up to the noise.
    pub fn blobs(n: usize, dims: usize, seed: u64) -> (Array2<f64>, Array1<u8>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = Array2::zeros((n, dims));
        let mut y = Array1::zeros(n);
        for i in 0..n {
            let label = (i % 2) as u8;
            let centre = if label == 1 { 1.0 } else { -1.0 };
            for j in 0..dims {
                x[[i, j]] = centre + rng.gen_range(-1.2..1.2);
            }
            y[i] = label;
        }
        (x, y)
    }

    /// Label depends on a single axis-aligned threshold (x0 > 0.5), which
    /// trees should recover exactly.
    pub fn step(n: usize, seed: u64) -> (Array2<f64>, Array1<u8>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = Array2::zeros((n, 3));
        let mut y = Array1::zeros(n);
        for i in 0..n {
            for j in 0..3 {
                x[[i, j]] = rng.gen_range(-2.0..2.0);
            }
            y[i] = u8::from(x[[i, 0]] > 0.5);
        }
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn sigmoid_is_symmetric_and_bounded() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn validation_rejects_bad_training_sets() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(
            validate_training_set(x.view(), array![0u8].view()),
            Err(ModelError::LabelCountMismatch { rows: 2, labels: 1 })
        );
        assert_eq!(
            validate_training_set(x.view(), array![1u8, 1].view()),
            Err(ModelError::SingleClass(1))
        );
        assert_eq!(
            validate_training_set(x.view(), array![0u8, 2].view()),
            Err(ModelError::InvalidLabel(2))
        );
        let nan = array![[1.0, f64::NAN], [3.0, 4.0]];
        assert_eq!(
            validate_training_set(nan.view(), array![0u8, 1].view()),
            Err(ModelError::NonFiniteInput { column: 1 })
        );
        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(
            validate_training_set(empty.view(), ndarray::Array1::<u8>::zeros(0).view()),
            Err(ModelError::EmptyDataset)
        );
        assert!(validate_training_set(x.view(), array![0u8, 1].view()).is_ok());
    }
}
