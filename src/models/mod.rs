pub mod enums;
pub mod prediction;

pub use enums::{DiseaseId, InvalidEnum, ModelFamily, Prediction, RiskLevel};
pub use prediction::{PredictionResult, ENSEMBLE_MODEL_LABEL};
