use std::sync::OnceLock;

use super::registry::ModelRegistry;
use crate::config::TrainingConfig;
use crate::disease::{Comparison, DiseaseSpec, Distribution, FeatureSpec, LabelRule, MetaModelSpec};
use crate::engine::classifiers::LogisticParams;
use crate::models::DiseaseId;

static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// Registry trained once with the default configuration and shared by every
/// test in the binary.
pub(crate) fn shared_registry() -> &'static ModelRegistry {
    REGISTRY.get_or_init(|| {
        ModelRegistry::train(TrainingConfig::default()).expect("default training must succeed")
    })
}

static LONE_FEATURE: [FeatureSpec; 1] = [FeatureSpec {
    name: "marker",
    default: 0.0,
    distribution: Distribution::Normal {
        mean: 0.0,
        std_dev: 1.0,
    },
}];

static MARKER_RULE: [LabelRule; 1] = [LabelRule {
    feature: "marker",
    op: Comparison::Greater,
    threshold: 0.0,
    weight: 1.0,
}];

static GHOST_RULE: [LabelRule; 1] = [LabelRule {
    feature: "not_a_column",
    op: Comparison::Greater,
    threshold: 0.0,
    weight: 1.0,
}];

/// Specs that cannot be trained: `[0]` has an empty model plan, `[1]` has a
/// label rule on a feature it does not define.
pub(crate) static BROKEN_SPECS: [DiseaseSpec; 2] = [
    DiseaseSpec {
        id: DiseaseId::Heart,
        name: "Empty plan",
        features: &LONE_FEATURE,
        required: &["marker"],
        confidence_threshold: 0.5,
        importance: &[("marker", 1.0)],
        label_rules: &MARKER_RULE,
        label_noise: 0.1,
        base_models: &[],
        meta_model: MetaModelSpec::Logistic(LogisticParams::DEFAULT),
    },
    DiseaseSpec {
        id: DiseaseId::Stroke,
        name: "Unknown rule feature",
        features: &LONE_FEATURE,
        required: &["marker"],
        confidence_threshold: 0.5,
        importance: &[("marker", 1.0)],
        label_rules: &GHOST_RULE,
        label_noise: 0.1,
        base_models: &[],
        meta_model: MetaModelSpec::Logistic(LogisticParams::DEFAULT),
    },
];
