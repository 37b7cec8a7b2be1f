//! Stacked-ensemble prediction engine.
//!
//! Inference for one request runs
//! resolver -> scaler -> base model bank -> meta blender -> risk classifier,
//! all against state fitted once by [`ModelRegistry::train`].

pub mod bank;
pub mod classifiers;
pub mod error;
pub mod meta;
pub mod registry;
pub mod resolver;
pub mod risk;
pub mod scaler;
pub mod synthetic;
pub mod training;

#[cfg(test)]
pub(crate) mod test_support;

pub use bank::{BaseModel, BaseModelBank};
pub use error::{ModelError, PredictionError, TrainingError};
pub use meta::MetaBlender;
pub use registry::ModelRegistry;
pub use resolver::{missing_required, resolve, ParameterMap};
pub use risk::classify_risk;
pub use scaler::StandardScaler;
pub use training::{DiseasePipeline, PipelineState, TrainingSummary};
