//! Seeded synthetic training sets.
//!
//! Columns are drawn independently from each feature's distribution, in
//! feature order. Labels come from the disease's rule table plus Gaussian
//! noise: `y = Σ weight · [feature op threshold] + N(0, σ) > 0.5`.

use ndarray::{Array1, Array2, ArrayViewMut1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution as _, Normal, Poisson};

use super::error::ModelError;
use crate::disease::{DiseaseSpec, Distribution};

/// Risk score above which a synthetic row is labelled positive.
pub const LABEL_CUTOFF: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub features: Array2<f64>,
    pub labels: Array1<u8>,
}

impl SyntheticDataset {
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&label| label == 1).count() as f64 / self.labels.len() as f64
    }
}

/// Generate `n_samples` rows for `spec`. The same seed always yields the
/// same dataset.
pub fn generate(spec: &DiseaseSpec, n_samples: usize, seed: u64) -> Result<SyntheticDataset, ModelError> {
    if n_samples == 0 {
        return Err(ModelError::EmptyDataset);
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let mut features = Array2::<f64>::zeros((n_samples, spec.feature_count()));
    for (column, feature) in spec.features.iter().enumerate() {
        fill_column(&feature.distribution, features.column_mut(column), &mut rng)?;
    }

    let rules = spec
        .label_rules
        .iter()
        .map(|rule| {
            spec.feature_index(rule.feature)
                .map(|index| (index, rule))
                .ok_or_else(|| ModelError::UnknownFeature(rule.feature.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let noise = Normal::new(0.0, spec.label_noise)
        .map_err(|e| ModelError::InvalidParameter(format!("label noise for {}: {e}", spec.id)))?;

    let labels = features
        .rows()
        .into_iter()
        .map(|row| {
            let score: f64 = rules
                .iter()
                .filter(|(index, rule)| rule.op.holds(row[*index], rule.threshold))
                .map(|(_, rule)| rule.weight)
                .sum();
            u8::from(score + noise.sample(&mut rng) > LABEL_CUTOFF)
        })
        .collect();

    Ok(SyntheticDataset { features, labels })
}

fn fill_column(
    distribution: &Distribution,
    mut values: ArrayViewMut1<'_, f64>,
    rng: &mut StdRng,
) -> Result<(), ModelError> {
    let invalid = |e: &dyn std::fmt::Display| ModelError::InvalidParameter(format!("{distribution:?}: {e}"));
    match *distribution {
        Distribution::Normal { mean, std_dev } => {
            let normal = Normal::new(mean, std_dev).map_err(|e| invalid(&e))?;
            values.iter_mut().for_each(|v| *v = normal.sample(rng));
        }
        Distribution::Poisson { lambda } => {
            let poisson = Poisson::new(lambda).map_err(|e| invalid(&e))?;
            values.iter_mut().for_each(|v| *v = poisson.sample(rng));
        }
        Distribution::Bernoulli { p } => {
            let binomial = Binomial::new(1, p).map_err(|e| invalid(&e))?;
            values.iter_mut().for_each(|v| *v = binomial.sample(rng) as f64);
        }
        Distribution::UniformInt { low, high } => {
            if low >= high {
                return Err(invalid(&format!("empty range {low}..{high}")));
            }
            values.iter_mut().for_each(|v| *v = rng.gen_range(low..high) as f64);
        }
    }
    Ok(())
}
