use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name any variant of a catalog enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value:?}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DiseaseId {
    Diabetes => "diabetes",
    Heart => "heart",
    Parkinson => "parkinson",
    Hypertension => "hypertension",
    CancerRisk => "cancer_risk",
    KidneyDisease => "kidney_disease",
    LiverDisease => "liver_disease",
    Stroke => "stroke",
});

str_enum!(Prediction {
    Negative => "negative",
    Positive => "positive",
});

// Declaration order is severity order: the derived `Ord` relies on it.
str_enum!(RiskLevel {
    VeryLow => "very_low",
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(ModelFamily {
    RandomForest => "random_forest",
    GradientBoosting => "gradient_boosting",
    KernelSvm => "kernel_svm",
    LogisticRegression => "logistic_regression",
});

impl DiseaseId {
    /// Parse a caller-supplied identifier. Surrounding whitespace and case
    /// are ignored ("Diabetes", " HEART ").
    pub fn parse(raw: &str) -> Result<Self, InvalidEnum> {
        raw.trim().to_ascii_lowercase().parse()
    }
}

impl Prediction {
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}
