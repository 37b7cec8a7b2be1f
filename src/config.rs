use serde::Serialize;

use crate::engine::TrainingError;

/// Application-level constants
pub const APP_NAME: &str = "medpredict";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seed used for every synthetic dataset and seeded learner.
pub const DEFAULT_SEED: u64 = 42;

/// Rows generated per disease when building the training sets.
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

/// Environment variable overriding [`TrainingConfig::seed`].
pub const SEED_ENV: &str = "MEDPREDICT_SEED";

/// Environment variable overriding [`TrainingConfig::n_samples`].
pub const SAMPLES_ENV: &str = "MEDPREDICT_SAMPLES";

/// Smallest dataset the trainer accepts. Below this the bagged trees and the
/// Platt calibration have too few rows per class to fit anything.
pub const MIN_SAMPLE_COUNT: usize = 100;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medpredict_lib=info,medpredict=info"
}

/// Parameters of the one-shot training run performed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainingConfig {
    /// Seed for data generation and for every seeded learner.
    pub seed: u64,
    /// Synthetic rows generated per disease.
    pub n_samples: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            n_samples: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl TrainingConfig {
    /// Build the config from `MEDPREDICT_SEED` / `MEDPREDICT_SAMPLES`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, TrainingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, TrainingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(SEED_ENV) {
            config.seed = raw.trim().parse().map_err(|_| {
                TrainingError::Config(format!("{SEED_ENV} must be an unsigned integer, got {raw:?}"))
            })?;
        }

        if let Some(raw) = lookup(SAMPLES_ENV) {
            config.n_samples = raw.trim().parse().map_err(|_| {
                TrainingError::Config(format!("{SAMPLES_ENV} must be an unsigned integer, got {raw:?}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the trainer cannot work with.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.n_samples < MIN_SAMPLE_COUNT {
            return Err(TrainingError::Config(format!(
                "n_samples must be at least {MIN_SAMPLE_COUNT}, got {}",
                self.n_samples
            )));
        }
        Ok(())
    }
}
