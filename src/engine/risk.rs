//! Maps the ensemble probability to a verdict, a clamped confidence and a
//! four-level risk band.

use crate::models::{Prediction, RiskLevel};

pub const MIN_CONFIDENCE: f64 = 0.50;
pub const MAX_CONFIDENCE: f64 = 0.98;

/// Width of the band below the disease threshold that still counts as
/// elevated risk.
pub const MEDIUM_BAND: f64 = 0.15;

/// `(prediction, confidence, risk_level)` for probability `p` under a
/// disease-specific `threshold`.
///
/// Confidence is `p` clamped to `[0.50, 0.98]`. Note that it is the clamped
/// positive-class probability even for negative verdicts, so every
/// negative lands below the threshold bands and reads as very low or low.
pub fn classify_risk(probability: f64, threshold: f64) -> (Prediction, f64, RiskLevel) {
    let positive = probability >= 0.5;
    let prediction = if positive { Prediction::Positive } else { Prediction::Negative };
    let confidence = probability.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    let risk_level = if confidence >= threshold {
        if positive { RiskLevel::High } else { RiskLevel::VeryLow }
    } else if confidence >= threshold - MEDIUM_BAND {
        if positive { RiskLevel::Medium } else { RiskLevel::Low }
    } else if positive {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    };

    (prediction, confidence, risk_level)
}
