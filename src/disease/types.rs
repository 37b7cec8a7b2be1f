use serde::Serialize;

use crate::engine::classifiers::{BoostingParams, ForestParams, LogisticParams, SvmParams};
use crate::models::DiseaseId;

// ═══════════════════════════════════════════════════════════
// Features
// ═══════════════════════════════════════════════════════════

/// Parametric distribution a synthetic training column is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Normal { mean: f64, std_dev: f64 },
    Poisson { lambda: f64 },
    /// Single-trial binomial: 1 with probability `p`, else 0.
    Bernoulli { p: f64 },
    /// Integer drawn uniformly from `low..high` (upper bound excluded).
    UniformInt { low: i64, high: i64 },
}

/// One input column of a disease model.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    /// Substituted when the caller omits the parameter.
    pub default: f64,
    pub distribution: Distribution,
}

// ═══════════════════════════════════════════════════════════
// Label rules
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Greater => value > threshold,
            Self::Less => value < threshold,
            Self::Equal => value == threshold,
        }
    }
}

/// One term of the synthetic risk score: `weight` is added when
/// `feature op threshold` holds.
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub feature: &'static str,
    pub op: Comparison,
    pub threshold: f64,
    pub weight: f64,
}

// ═══════════════════════════════════════════════════════════
// Model plan
// ═══════════════════════════════════════════════════════════

/// First-stage learner and its tuning constants.
#[derive(Debug, Clone, Copy)]
pub enum BaseModelSpec {
    RandomForest(ForestParams),
    GradientBoosting(BoostingParams),
    KernelSvm(SvmParams),
}

/// Second-stage learner over the base probabilities.
#[derive(Debug, Clone, Copy)]
pub enum MetaModelSpec {
    Logistic(LogisticParams),
    Boosted(BoostingParams),
}

// ═══════════════════════════════════════════════════════════
// DiseaseSpec
// ═══════════════════════════════════════════════════════════

/// Everything the engine knows about one disease.
///
/// `features` order is the column order of the scaler and of every fitted
/// model. Reordering it invalidates trained state.
#[derive(Debug)]
pub struct DiseaseSpec {
    pub id: DiseaseId,
    pub name: &'static str,
    pub features: &'static [FeatureSpec],
    /// Curated minimal input set published to callers.
    pub required: &'static [&'static str],
    pub confidence_threshold: f64,
    pub importance: &'static [(&'static str, f64)],
    pub label_rules: &'static [LabelRule],
    /// Standard deviation of the Gaussian noise added to the risk score.
    pub label_noise: f64,
    /// Order defines the meta model's input columns.
    pub base_models: &'static [BaseModelSpec],
    pub meta_model: MetaModelSpec,
}

impl DiseaseSpec {
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name).collect()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    pub fn default_for(&self, name: &str) -> Option<f64> {
        self.features.iter().find(|f| f.name == name).map(|f| f.default)
    }

    /// Features outside the curated required subset, in model order.
    pub fn optional(&self) -> Vec<&'static str> {
        self.features
            .iter()
            .map(|f| f.name)
            .filter(|name| !self.required.contains(name))
            .collect()
    }

    pub fn info(&self) -> DiseaseInfo {
        DiseaseInfo {
            id: self.id,
            name: self.name,
            required_params: self.required.to_vec(),
            optional_params: self.optional(),
        }
    }
}

/// Public description of a supported disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseInfo {
    pub id: DiseaseId,
    pub name: &'static str,
    pub required_params: Vec<&'static str>,
    pub optional_params: Vec<&'static str>,
}
