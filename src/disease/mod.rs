//! Disease catalog.
//!
//! Each supported disease is described by a static [`DiseaseSpec`]: the
//! ordered feature list the models are trained on, per-feature defaults,
//! the rule table that labels the synthetic training set, and the plan of
//! base and meta learners.

pub mod catalog;
pub mod types;

pub use catalog::{all, spec};
pub use types::{
    BaseModelSpec, Comparison, DiseaseInfo, DiseaseSpec, Distribution, FeatureSpec, LabelRule,
    MetaModelSpec,
};
