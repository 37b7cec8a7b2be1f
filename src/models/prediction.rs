use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::{Prediction, RiskLevel};

/// Value reported in [`PredictionResult::model_used`].
pub const ENSEMBLE_MODEL_LABEL: &str = "ensemble";

/// Outcome of one `predict` call. Built fresh per request; never stored by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Prediction,
    /// Final ensemble probability clamped to `[0.50, 0.98]`.
    pub confidence: f64,
    pub risk_level: RiskLevel,
    /// Explanatory weights per feature. Not used by the prediction math.
    pub feature_importance: BTreeMap<String, f64>,
    pub model_used: String,
}
