use std::fmt;

use linfa::dataset::Pr;
use linfa::prelude::{Dataset, Fit, Predict};
use linfa_svm::Svm;
use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::{validate_training_set, ProbabilisticClassifier};
use crate::engine::error::ModelError;
use crate::models::ModelFamily;

/// RBF-kernel SVM settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParams {
    /// Soft-margin cost, applied to both classes.
    pub c: f64,
    /// Rows drawn (seeded, without replacement) for the dense kernel
    /// matrix. Larger training sets are subsampled to this size.
    pub max_training_rows: usize,
}

impl SvmParams {
    pub const fn new(c: f64) -> Self {
        Self {
            c,
            max_training_rows: 2_000,
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if self.max_training_rows < 2 {
            return Err(ModelError::InvalidParameter(
                "max_training_rows must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Width of the Gaussian kernel `exp(-|x - x'|^2 / eps)` for the "scale"
/// heuristic `gamma = 1 / (n_features * var(X))`, i.e. `eps = 1 / gamma`.
/// On standardized input this is close to `n_features`.
fn scale_kernel_width(x: ArrayView2<'_, f64>) -> f64 {
    let n_features = x.ncols() as f64;
    let variance = x.var(0.0);
    if variance > 0.0 {
        n_features * variance
    } else {
        n_features
    }
}

/// C-SVC with a Gaussian kernel, fitted by `linfa-svm`, with Platt-scaled
/// probability output.
///
/// The Platt sigmoid is fitted on the training decision values, not by
/// internal cross-validation, so probabilities near the training set are
/// somewhat sharper than a cross-validated calibration would give.
pub struct KernelSvm {
    model: Svm<f64, Pr>,
    n_features: usize,
    training_rows: usize,
}

impl KernelSvm {
    pub fn fit(
        params: &SvmParams,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        seed: u64,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        validate_training_set(x, y)?;

        let (records, labels) = if x.nrows() > params.max_training_rows {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut rows = index::sample(&mut rng, x.nrows(), params.max_training_rows).into_vec();
            rows.sort_unstable();
            (x.select(Axis(0), &rows), y.select(Axis(0), &rows))
        } else {
            (x.to_owned(), y.to_owned())
        };
        validate_training_set(records.view(), labels.view())?;

        let training_rows = records.nrows();
        let kernel_width = scale_kernel_width(records.view());
        let dataset = Dataset::new(records, labels.mapv(|label| label == 1));

        let model = Svm::<f64, Pr>::params()
            .pos_neg_weights(params.c, params.c)
            .gaussian_kernel(kernel_width)
            .fit(&dataset)
            .map_err(|e| ModelError::Solver(format!("kernel svm: {e}")))?;

        Ok(Self {
            model,
            n_features: x.ncols(),
            training_rows,
        })
    }

    pub fn support_vector_count(&self) -> usize {
        self.model.nsupport()
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }
}

impl fmt::Debug for KernelSvm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelSvm")
            .field("n_features", &self.n_features)
            .field("training_rows", &self.training_rows)
            .field("support_vectors", &self.model.nsupport())
            .finish()
    }
}

impl ProbabilisticClassifier for KernelSvm {
    fn family(&self) -> ModelFamily {
        ModelFamily::KernelSvm
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        let batch = row.insert_axis(Axis(0));
        let probabilities = self.model.predict(&batch);
        f64::from(*probabilities[0]).clamp(0.0, 1.0)
    }
}
