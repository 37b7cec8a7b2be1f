use std::fmt;

use linfa::prelude::{Dataset, Fit};
use linfa_logistic::FittedLogisticRegression;
use ndarray::{ArrayView1, ArrayView2, Axis};

use super::{validate_training_set, ProbabilisticClassifier};
use crate::engine::error::ModelError;
use crate::models::ModelFamily;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Inverse regularisation strength.
    pub c: f64,
    pub max_iter: u64,
    /// L-BFGS stops once the gradient norm drops below this.
    pub tol: f64,
}

impl LogisticParams {
    pub const DEFAULT: Self = Self {
        c: 1.0,
        max_iter: 100,
        tol: 1e-6,
    };
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// L2-regularised logistic regression with an unpenalised intercept,
/// fitted by `linfa-logistic`. `alpha = 1 / C`, so `C = 1` matches the
/// usual `1/2 |w|^2 + C Σ logloss` objective.
pub struct LogisticRegression {
    model: FittedLogisticRegression<f64, u8>,
    n_features: usize,
}

impl LogisticRegression {
    pub fn fit(
        params: &LogisticParams,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
    ) -> Result<Self, ModelError> {
        if !(params.c > 0.0 && params.c.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "C must be positive, got {}",
                params.c
            )));
        }
        validate_training_set(x, y)?;

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = linfa_logistic::LogisticRegression::default()
            .alpha(1.0 / params.c)
            .max_iterations(params.max_iter)
            .gradient_tolerance(params.tol)
            .fit(&dataset)
            .map_err(|e| ModelError::Solver(format!("logistic regression: {e}")))?;

        if model.params().iter().any(|w| !w.is_finite()) || !model.intercept().is_finite() {
            return Err(ModelError::Diverged("logistic coefficients".into()));
        }

        Ok(Self {
            model,
            n_features: x.ncols(),
        })
    }

    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.model.params().view()
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }
}

impl fmt::Debug for LogisticRegression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogisticRegression")
            .field("coefficients", self.model.params())
            .field("intercept", &self.model.intercept())
            .finish()
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn family(&self) -> ModelFamily {
        ModelFamily::LogisticRegression
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Probability of label 1, the larger of the two fitted classes.
    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        let batch = row.insert_axis(Axis(0));
        self.model.predict_probabilities(&batch)[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifiers::fixtures;
    use ndarray::array;

    #[test]
    fn fits_blobs_with_positive_weights() {
        let (x, y) = fixtures::blobs(200, 2, 6);
        let model = LogisticRegression::fit(&LogisticParams::DEFAULT, x.view(), y.view()).unwrap();
        assert!(model.coefficients().iter().all(|&w| w > 0.0));
        assert!(model.predict_probability(array![1.0, 1.0].view()) > 0.9);
        assert!(model.predict_probability(array![-1.0, -1.0].view()) < 0.1);
    }

    #[test]
    fn separable_data_stays_finite() {
        // Perfect separation: the L2 term keeps the weights bounded.
        let x = array![[0.0], [0.1], [0.2], [0.8], [0.9], [1.0]];
        let y = array![0u8, 0, 0, 1, 1, 1];
        let model = LogisticRegression::fit(&LogisticParams::DEFAULT, x.view(), y.view()).unwrap();
        assert!(model.coefficients()[0].is_finite());
        assert!(model.intercept().is_finite());
        assert!(model.predict_probability(array![1.0].view()) > 0.5);
        assert!(model.predict_probability(array![0.0].view()) < 0.5);
    }

    #[test]
    fn stronger_regularisation_shrinks_weights() {
        let (x, y) = fixtures::blobs(200, 3, 11);
        let loose = LogisticRegression::fit(&LogisticParams::DEFAULT, x.view(), y.view()).unwrap();
        let tight = LogisticParams {
            c: 0.01,
            ..LogisticParams::DEFAULT
        };
        let tight = LogisticRegression::fit(&tight, x.view(), y.view()).unwrap();
        let norm = |m: &LogisticRegression| m.coefficients().dot(&m.coefficients());
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn batch_and_row_scores_agree() {
        let (x, y) = fixtures::blobs(50, 4, 2);
        let model = LogisticRegression::fit(&LogisticParams::DEFAULT, x.view(), y.view()).unwrap();
        assert_eq!(model.n_features(), 4);
        assert_eq!(model.family(), ModelFamily::LogisticRegression);
        let batch = model.predict_probabilities(x.view());
        for (i, row) in x.rows().into_iter().enumerate() {
            assert!((batch[i] - model.predict_probability(row)).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_non_positive_cost() {
        let (x, y) = fixtures::blobs(20, 2, 1);
        let params = LogisticParams {
            c: 0.0,
            ..LogisticParams::DEFAULT
        };
        assert!(matches!(
            LogisticRegression::fit(&params, x.view(), y.view()),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
