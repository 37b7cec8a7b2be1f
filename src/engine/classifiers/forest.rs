use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::binning::BinnedMatrix;
use super::tree::{RegressionTree, TreeParams, TreeSignal};
use super::{validate_training_set, ProbabilisticClassifier, MAX_SPLIT_THRESHOLDS};
use crate::engine::error::ModelError;
use crate::models::ModelFamily;

/// Bagged decision-tree ensemble settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl ForestParams {
    pub const fn new(n_trees: usize, max_depth: usize) -> Self {
        Self {
            n_trees,
            max_depth,
            min_samples_split: 2,
        }
    }

    pub const fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_trees == 0 {
            return Err(ModelError::InvalidParameter("n_trees must be positive".into()));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter("max_depth must be positive".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(
                "min_samples_split must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Random forest: each tree is grown on a bootstrap resample and looks at
/// `sqrt(n_features)` randomly chosen features per split. The class-1
/// probability is the mean of the trees' leaf class-1 fractions.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn fit(
        params: &ForestParams,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        validate_training_set(x, y)?;

        let n_rows = x.nrows();
        let n_features = x.ncols();
        let data = BinnedMatrix::new(x, MAX_SPLIT_THRESHOLDS);
        let targets: Vec<f64> = y.iter().map(|&label| f64::from(label)).collect();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: 1,
            max_features: Some(max_features(n_features)),
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        let mut counts = vec![0u32; n_rows];

        for _ in 0..params.n_trees {
            counts.iter_mut().for_each(|c| *c = 0);
            for _ in 0..n_rows {
                counts[rng.gen_range(0..n_rows)] += 1;
            }
            let weights: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();
            let rows: Vec<usize> = (0..n_rows).filter(|&row| counts[row] > 0).collect();

            let signal = TreeSignal {
                targets: &targets,
                weights: &weights,
                leaf_denominators: None,
            };
            trees.push(RegressionTree::fit(&data, &signal, rows, tree_params, &mut rng));
        }

        Ok(Self { trees, n_features })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// `max(1, floor(sqrt(n)))` candidate features per split.
fn max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt() as usize).max(1)
}

impl ProbabilisticClassifier for RandomForest {
    fn family(&self) -> ModelFamily {
        ModelFamily::RandomForest
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        (total / self.trees.len() as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifiers::fixtures;

    #[test]
    fn separates_blobs() {
        let (x, y) = fixtures::blobs(400, 3, 7);
        let forest = RandomForest::fit(&ForestParams::new(25, 6), x.view(), y.view(), 42).unwrap();
        assert_eq!(forest.n_trees(), 25);

        let p = forest.predict_probabilities(x.view());
        let correct = p
            .iter()
            .zip(y.iter())
            .filter(|(p, &label)| (**p >= 0.5) == (label == 1))
            .count();
        assert!(correct as f64 / 400.0 > 0.9, "accuracy {correct}/400");
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = fixtures::blobs(200, 4, 1);
        let params = ForestParams::new(10, 5);
        let a = RandomForest::fit(&params, x.view(), y.view(), 42).unwrap();
        let b = RandomForest::fit(&params, x.view(), y.view(), 42).unwrap();
        for row in x.rows() {
            assert_eq!(
                a.predict_probability(row).to_bits(),
                b.predict_probability(row).to_bits()
            );
        }
    }

    #[test]
    fn sqrt_feature_budget() {
        assert_eq!(max_features(1), 1);
        assert_eq!(max_features(8), 2);
        assert_eq!(max_features(9), 3);
        assert_eq!(max_features(12), 3);
    }

    #[test]
    fn rejects_invalid_params() {
        let (x, y) = fixtures::blobs(20, 2, 1);
        let err = RandomForest::fit(&ForestParams::new(0, 3), x.view(), y.view(), 42).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter(_)));
        let params = ForestParams::new(5, 3).with_min_samples_split(1);
        assert!(RandomForest::fit(&params, x.view(), y.view(), 42).is_err());
    }
}
