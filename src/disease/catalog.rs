//! Static per-disease tables: feature order, defaults, sampling
//! distributions, label rules, explanatory weights and model plans.
//!
//! Defaults are keyed by disease: `albumin` means something different for
//! kidney and liver panels, and each table carries its own value.

use super::types::{
    BaseModelSpec, Comparison, DiseaseSpec, Distribution, FeatureSpec, LabelRule, MetaModelSpec,
};
use crate::engine::classifiers::{BoostingParams, ForestParams, LogisticParams, SvmParams};
use crate::models::DiseaseId;

// ── Table helpers ───────────────────────────────────────────

const fn normal(name: &'static str, default: f64, mean: f64, std_dev: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        default,
        distribution: Distribution::Normal { mean, std_dev },
    }
}

const fn poisson(name: &'static str, default: f64, lambda: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        default,
        distribution: Distribution::Poisson { lambda },
    }
}

const fn bernoulli(name: &'static str, default: f64, p: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        default,
        distribution: Distribution::Bernoulli { p },
    }
}

const fn uniform_int(name: &'static str, default: f64, low: i64, high: i64) -> FeatureSpec {
    FeatureSpec {
        name,
        default,
        distribution: Distribution::UniformInt { low, high },
    }
}

const fn gt(feature: &'static str, threshold: f64, weight: f64) -> LabelRule {
    LabelRule {
        feature,
        op: Comparison::Greater,
        threshold,
        weight,
    }
}

const fn lt(feature: &'static str, threshold: f64, weight: f64) -> LabelRule {
    LabelRule {
        feature,
        op: Comparison::Less,
        threshold,
        weight,
    }
}

const fn is(feature: &'static str, value: f64, weight: f64) -> LabelRule {
    LabelRule {
        feature,
        op: Comparison::Equal,
        threshold: value,
        weight,
    }
}

const LOGISTIC_META: MetaModelSpec = MetaModelSpec::Logistic(LogisticParams::DEFAULT);
const BOOSTED_META: MetaModelSpec = MetaModelSpec::Boosted(BoostingParams::new(100, 0.1, 3));

// ═══════════════════════════════════════════════════════════
// Diabetes
// ═══════════════════════════════════════════════════════════

const DIABETES: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::Diabetes,
    name: "Type 2 Diabetes",
    features: &[
        normal("glucose", 120.0, 120.0, 40.0),
        normal("bmi", 32.0, 32.0, 8.0),
        normal("age", 45.0, 45.0, 15.0),
        normal("blood_pressure", 70.0, 70.0, 15.0),
        poisson("pregnancies", 0.0, 3.0),
        normal("skin_thickness", 20.0, 20.0, 10.0),
        normal("insulin", 80.0, 80.0, 100.0),
        normal("diabetes_pedigree", 0.5, 0.5, 0.3),
    ],
    required: &["glucose", "bmi", "age", "blood_pressure"],
    confidence_threshold: 0.75,
    importance: &[
        ("glucose", 0.28),
        ("bmi", 0.22),
        ("age", 0.18),
        ("blood_pressure", 0.12),
        ("diabetes_pedigree", 0.10),
        ("insulin", 0.06),
        ("skin_thickness", 0.04),
    ],
    label_rules: &[
        gt("glucose", 140.0, 0.30),
        gt("bmi", 30.0, 0.20),
        gt("age", 45.0, 0.15),
        gt("blood_pressure", 80.0, 0.15),
        gt("diabetes_pedigree", 0.8, 0.20),
    ],
    label_noise: 0.10,
    base_models: &[
        BaseModelSpec::RandomForest(ForestParams::new(200, 10).with_min_samples_split(5)),
        BaseModelSpec::GradientBoosting(BoostingParams::new(150, 0.05, 6)),
    ],
    meta_model: LOGISTIC_META,
};

// ═══════════════════════════════════════════════════════════
// Heart disease
// ═══════════════════════════════════════════════════════════

const HEART: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::Heart,
    name: "Heart Disease",
    features: &[
        normal("age", 54.0, 54.0, 9.0),
        normal("cholesterol", 246.0, 246.0, 51.0),
        normal("blood_pressure", 131.0, 131.0, 17.0),
        normal("heart_rate", 75.0, 75.0, 12.0),
        normal("max_hr", 150.0, 149.0, 23.0),
        bernoulli("exercise_induced_angina", 0.0, 0.33),
        normal("oldpeak", 1.0, 1.0, 1.2),
        poisson("ca", 0.0, 1.0),
        uniform_int("thal", 1.0, 0, 3),
    ],
    required: &["age", "cholesterol", "blood_pressure", "heart_rate"],
    confidence_threshold: 0.70,
    importance: &[
        ("cholesterol", 0.24),
        ("blood_pressure", 0.20),
        ("age", 0.18),
        ("max_hr", 0.16),
        ("exercise_induced_angina", 0.10),
        ("oldpeak", 0.08),
        ("ca", 0.04),
    ],
    label_rules: &[
        gt("age", 55.0, 0.18),
        gt("cholesterol", 240.0, 0.22),
        gt("blood_pressure", 140.0, 0.20),
        lt("max_hr", 140.0, 0.15),
        is("exercise_induced_angina", 1.0, 0.10),
        gt("oldpeak", 2.0, 0.10),
        gt("ca", 0.0, 0.05),
    ],
    label_noise: 0.15,
    base_models: &[
        BaseModelSpec::KernelSvm(SvmParams::new(1.0)),
        BaseModelSpec::RandomForest(ForestParams::new(150, 12)),
    ],
    meta_model: BOOSTED_META,
};

// ═══════════════════════════════════════════════════════════
// Parkinson's disease
// ═══════════════════════════════════════════════════════════

const PARKINSON: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::Parkinson,
    name: "Parkinson's Disease",
    features: &[
        normal("age", 65.0, 65.0, 12.0),
        normal("tremor_score", 5.0, 5.0, 4.0),
        normal("motor_score", 20.0, 20.0, 15.0),
        normal("voice_variation", 3.0, 3.0, 2.0),
        normal("jitter", 0.007, 0.007, 0.004),
        normal("shimmer", 0.03, 0.03, 0.02),
        normal("nhr", 0.02, 0.02, 0.01),
        normal("hnr", 22.0, 22.0, 8.0),
        normal("rpde", 0.5, 0.5, 0.2),
        normal("d2", 2.5, 2.5, 1.0),
        normal("ppe", 0.2, 0.2, 0.1),
    ],
    required: &["age", "tremor_score", "motor_score", "voice_variation"],
    confidence_threshold: 0.78,
    importance: &[
        ("tremor_score", 0.25),
        ("motor_score", 0.22),
        ("voice_variation", 0.18),
        ("age", 0.15),
        ("jitter", 0.08),
        ("shimmer", 0.07),
        ("ppe", 0.05),
    ],
    label_rules: &[
        gt("age", 60.0, 0.15),
        gt("tremor_score", 7.0, 0.20),
        gt("motor_score", 25.0, 0.18),
        lt("voice_variation", 2.0, 0.15),
        gt("jitter", 0.01, 0.12),
        gt("shimmer", 0.04, 0.10),
        gt("ppe", 0.25, 0.10),
    ],
    label_noise: 0.12,
    base_models: &[
        BaseModelSpec::GradientBoosting(BoostingParams::new(200, 0.1, 8).with_subsample(0.8)),
        BaseModelSpec::RandomForest(ForestParams::new(100, 15)),
    ],
    meta_model: LOGISTIC_META,
};

// ═══════════════════════════════════════════════════════════
// Hypertension
// ═══════════════════════════════════════════════════════════

const HYPERTENSION: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::Hypertension,
    name: "Hypertension",
    features: &[
        normal("age", 52.0, 52.0, 15.0),
        normal("bmi", 27.0, 27.0, 5.0),
        normal("systolic_bp", 120.0, 135.0, 25.0),
        normal("diastolic_bp", 80.0, 85.0, 12.0),
        normal("cholesterol", 240.0, 240.0, 50.0),
        normal("fasting_blood_sugar", 100.0, 100.0, 25.0),
        bernoulli("family_history", 0.0, 0.25),
        bernoulli("smoking", 0.0, 0.15),
        bernoulli("alcohol", 0.0, 0.20),
    ],
    required: &["age", "bmi", "systolic_bp", "diastolic_bp"],
    confidence_threshold: 0.72,
    importance: &[
        ("systolic_bp", 0.28),
        ("diastolic_bp", 0.22),
        ("age", 0.16),
        ("bmi", 0.12),
        ("cholesterol", 0.10),
        ("fasting_blood_sugar", 0.08),
        ("family_history", 0.04),
    ],
    label_rules: &[
        gt("age", 50.0, 0.15),
        gt("bmi", 25.0, 0.12),
        gt("systolic_bp", 140.0, 0.25),
        gt("diastolic_bp", 90.0, 0.20),
        gt("cholesterol", 240.0, 0.10),
        gt("fasting_blood_sugar", 100.0, 0.08),
        is("family_history", 1.0, 0.05),
        is("smoking", 1.0, 0.03),
        is("alcohol", 1.0, 0.02),
    ],
    label_noise: 0.12,
    base_models: &[
        BaseModelSpec::RandomForest(ForestParams::new(180, 10)),
        BaseModelSpec::GradientBoosting(BoostingParams::new(120, 0.08, 3)),
    ],
    meta_model: LOGISTIC_META,
};

// ═══════════════════════════════════════════════════════════
// Cancer risk
// ═══════════════════════════════════════════════════════════

const CANCER_RISK: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::CancerRisk,
    name: "Cancer Risk Assessment",
    features: &[
        normal("age", 55.0, 55.0, 18.0),
        bernoulli("family_history", 0.0, 0.20),
        bernoulli("smoking", 0.0, 0.15),
        bernoulli("alcohol", 0.0, 0.10),
        normal("bmi", 28.0, 28.0, 7.0),
        normal("physical_activity", 100.0, 100.0, 30.0),
        bernoulli("radiation_exposure", 0.0, 0.12),
        bernoulli("chemical_exposure", 0.0, 0.08),
        normal("years_of_exposure", 0.0, 5.0, 3.0),
    ],
    required: &["age", "family_history", "smoking", "alcohol", "bmi"],
    confidence_threshold: 0.68,
    importance: &[
        ("family_history", 0.24),
        ("smoking", 0.18),
        ("age", 0.16),
        ("bmi", 0.12),
        ("alcohol", 0.10),
        ("physical_activity", 0.10),
        ("radiation_exposure", 0.06),
        ("chemical_exposure", 0.04),
    ],
    label_rules: &[
        gt("age", 60.0, 0.18),
        is("family_history", 1.0, 0.20),
        is("smoking", 1.0, 0.15),
        is("alcohol", 1.0, 0.10),
        gt("bmi", 30.0, 0.12),
        lt("physical_activity", 60.0, 0.10),
        is("radiation_exposure", 1.0, 0.08),
        is("chemical_exposure", 1.0, 0.05),
        gt("years_of_exposure", 10.0, 0.02),
    ],
    label_noise: 0.15,
    base_models: &[
        BaseModelSpec::RandomForest(ForestParams::new(200, 12)),
        BaseModelSpec::GradientBoosting(BoostingParams::new(150, 0.05, 3)),
    ],
    meta_model: LOGISTIC_META,
};

// ═══════════════════════════════════════════════════════════
// Kidney disease
// ═══════════════════════════════════════════════════════════

const KIDNEY_DISEASE: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::KidneyDisease,
    name: "Kidney Disease",
    features: &[
        normal("age", 55.0, 55.0, 18.0),
        normal("blood_pressure_high", 0.5, 0.5, 0.3),
        normal("blood_glucose_random", 130.0, 130.0, 50.0),
        normal("specific_gravity", 1.02, 1.02, 0.02),
        normal("albumin", 0.0, 0.0, 20.0),
        normal("sugar", 0.0, 0.0, 20.0),
        normal("blood_urea", 138.0, 138.0, 8.0),
        normal("serum_creatinine", 2.5, 2.5, 2.0),
        normal("sodium", 140.0, 140.0, 35.0),
        normal("potassium", 4.5, 4.5, 1.2),
        normal("hemoglobin", 13.5, 13.5, 4.5),
        normal("packed_cell_volume", 15000.0, 15000.0, 5000.0),
    ],
    required: &["age", "blood_pressure_high", "blood_glucose_random", "serum_creatinine"],
    confidence_threshold: 0.70,
    importance: &[
        ("serum_creatinine", 0.20),
        ("blood_pressure_high", 0.16),
        ("blood_glucose_random", 0.14),
        ("hemoglobin", 0.12),
        ("specific_gravity", 0.10),
        ("albumin", 0.08),
        ("packed_cell_volume", 0.08),
        ("blood_urea", 0.06),
        ("age", 0.06),
    ],
    label_rules: &[
        gt("age", 55.0, 0.12),
        gt("blood_pressure_high", 1.0, 0.15),
        gt("blood_glucose_random", 180.0, 0.12),
        lt("specific_gravity", 1.01, 0.10),
        gt("albumin", 0.0, 0.10),
        gt("sugar", 0.0, 0.08),
        gt("serum_creatinine", 4.0, 0.15),
        lt("hemoglobin", 11.0, 0.10),
        lt("packed_cell_volume", 12000.0, 0.08),
    ],
    label_noise: 0.12,
    base_models: &[
        BaseModelSpec::KernelSvm(SvmParams::new(1.5)),
        BaseModelSpec::RandomForest(ForestParams::new(150, 11)),
    ],
    meta_model: BOOSTED_META,
};

// ═══════════════════════════════════════════════════════════
// Liver disease
// ═══════════════════════════════════════════════════════════

const LIVER_DISEASE: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::LiverDisease,
    name: "Liver Disease",
    features: &[
        normal("age", 45.0, 45.0, 15.0),
        bernoulli("gender", 1.0, 0.55),
        normal("total_bilirubin", 4.5, 4.5, 3.5),
        normal("direct_bilirubin", 1.5, 1.5, 2.5),
        normal("alkaline_phosphatase", 220.0, 220.0, 100.0),
        normal("alamine_aminotransferase", 120.0, 120.0, 80.0),
        normal("aspartate_aminotransferase", 110.0, 110.0, 75.0),
        normal("total_protiens", 3.5, 3.5, 2.0),
        normal("albumin", 2.5, 2.5, 1.5),
        normal("albumin_globulin_ratio", 1.0, 1.0, 0.8),
    ],
    required: &["age", "total_bilirubin", "alamine_aminotransferase", "albumin"],
    confidence_threshold: 0.68,
    importance: &[
        ("total_bilirubin", 0.18),
        ("alamine_aminotransferase", 0.16),
        ("aspartate_aminotransferase", 0.14),
        ("direct_bilirubin", 0.12),
        ("albumin", 0.12),
        ("alkaline_phosphatase", 0.10),
        ("albumin_globulin_ratio", 0.10),
        ("age", 0.08),
    ],
    label_rules: &[
        gt("age", 45.0, 0.10),
        gt("total_bilirubin", 3.0, 0.18),
        gt("direct_bilirubin", 1.0, 0.12),
        gt("alkaline_phosphatase", 300.0, 0.12),
        gt("alamine_aminotransferase", 150.0, 0.14),
        gt("aspartate_aminotransferase", 140.0, 0.12),
        lt("albumin", 2.5, 0.12),
        lt("albumin_globulin_ratio", 0.8, 0.10),
    ],
    label_noise: 0.12,
    base_models: &[
        BaseModelSpec::GradientBoosting(BoostingParams::new(180, 0.07, 3)),
        BaseModelSpec::RandomForest(ForestParams::new(120, 10)),
    ],
    meta_model: LOGISTIC_META,
};

// ═══════════════════════════════════════════════════════════
// Stroke
// ═══════════════════════════════════════════════════════════

const STROKE: DiseaseSpec = DiseaseSpec {
    id: DiseaseId::Stroke,
    name: "Stroke Risk",
    features: &[
        normal("age", 55.0, 55.0, 18.0),
        bernoulli("hypertension", 0.0, 0.58),
        bernoulli("heart_disease", 0.0, 0.10),
        bernoulli("married", 0.0, 0.05),
        normal("avg_glucose_level", 105.0, 105.0, 20.0),
        normal("bmi", 28.0, 28.0, 7.0),
        bernoulli("smoking_status", 0.0, 0.43),
        bernoulli("gender", 1.0, 0.53),
        bernoulli("work_type", 0.0, 0.13),
    ],
    required: &["age", "hypertension", "heart_disease", "avg_glucose_level", "bmi"],
    confidence_threshold: 0.75,
    importance: &[
        ("hypertension", 0.26),
        ("age", 0.24),
        ("heart_disease", 0.20),
        ("avg_glucose_level", 0.14),
        ("bmi", 0.08),
        ("smoking_status", 0.08),
    ],
    label_rules: &[
        gt("age", 60.0, 0.20),
        is("hypertension", 1.0, 0.22),
        is("heart_disease", 1.0, 0.18),
        gt("avg_glucose_level", 125.0, 0.15),
        gt("bmi", 30.0, 0.10),
        is("smoking_status", 1.0, 0.10),
        is("gender", 0.0, 0.05),
    ],
    label_noise: 0.12,
    base_models: &[
        BaseModelSpec::RandomForest(ForestParams::new(200, 12)),
        BaseModelSpec::KernelSvm(SvmParams::new(1.2)),
    ],
    meta_model: BOOSTED_META,
};

static CATALOG: [DiseaseSpec; 8] = [
    DIABETES,
    HEART,
    PARKINSON,
    HYPERTENSION,
    CANCER_RISK,
    KIDNEY_DISEASE,
    LIVER_DISEASE,
    STROKE,
];

/// All disease specs, in training order.
pub fn all() -> &'static [DiseaseSpec] {
    &CATALOG
}

/// Catalog entry for one disease.
pub fn spec(id: DiseaseId) -> &'static DiseaseSpec {
    // CATALOG is declared in `DiseaseId` order; the test below pins that.
    &CATALOG[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_follows_disease_id_order() {
        for (index, id) in DiseaseId::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].id, *id);
            assert_eq!(spec(*id).id, *id);
        }
    }

    #[test]
    fn feature_names_are_unique_per_disease() {
        for disease in all() {
            let mut names = disease.feature_names();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "duplicate feature in {}", disease.id);
        }
    }

    #[test]
    fn rules_required_and_importance_reference_known_features() {
        for disease in all() {
            for rule in disease.label_rules {
                assert!(
                    disease.feature_index(rule.feature).is_some(),
                    "{}: label rule on unknown feature {}",
                    disease.id,
                    rule.feature
                );
            }
            for name in disease.required {
                assert!(disease.feature_index(name).is_some(), "{}: {name}", disease.id);
            }
            for (name, _) in disease.importance {
                assert!(disease.feature_index(name).is_some(), "{}: {name}", disease.id);
            }
        }
    }

    #[test]
    fn thresholds_inside_unit_interval() {
        for disease in all() {
            assert!(disease.confidence_threshold > 0.0 && disease.confidence_threshold < 1.0);
        }
    }

    #[test]
    fn every_disease_has_two_or_three_distinct_base_families() {
        use std::mem::discriminant;
        for disease in all() {
            let n = disease.base_models.len();
            assert!((2..=3).contains(&n), "{} has {n} base models", disease.id);
            for (i, a) in disease.base_models.iter().enumerate() {
                for b in &disease.base_models[i + 1..] {
                    assert_ne!(discriminant(a), discriminant(b), "{}", disease.id);
                }
            }
        }
    }

    #[test]
    fn albumin_default_is_disease_specific() {
        let kidney = spec(DiseaseId::KidneyDisease).default_for("albumin");
        let liver = spec(DiseaseId::LiverDisease).default_for("albumin");
        assert_eq!(kidney, Some(0.0));
        assert_eq!(liver, Some(2.5));
    }

    #[test]
    fn optional_params_are_the_non_required_features() {
        let diabetes = spec(DiseaseId::Diabetes);
        assert_eq!(
            diabetes.optional(),
            vec!["pregnancies", "skin_thickness", "insulin", "diabetes_pedigree"]
        );
        let info = spec(DiseaseId::Stroke).info();
        assert_eq!(info.name, "Stroke Risk");
        assert_eq!(info.optional_params, vec!["married", "smoking_status", "gender", "work_type"]);
    }
}
