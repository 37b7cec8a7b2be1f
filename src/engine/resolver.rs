//! Turns caller parameters into the ordered feature vector a disease model
//! expects.

use std::collections::HashMap;

use ndarray::Array1;
use serde_json::Value;

use super::error::PredictionError;
use crate::disease::DiseaseSpec;

/// Build the feature vector for `spec`, in model column order.
///
/// Missing parameters take the disease's default; keys the disease does not
/// use are ignored. Values are not range-checked, only required to be finite.
pub fn resolve(
    spec: &DiseaseSpec,
    parameters: &HashMap<String, f64>,
) -> Result<Array1<f64>, PredictionError> {
    spec.features
        .iter()
        .map(|feature| match parameters.get(feature.name) {
            Some(&value) if value.is_finite() => Ok(value),
            Some(&value) => Err(PredictionError::MalformedParameter {
                name: feature.name.to_string(),
                value: value.to_string(),
            }),
            None => Ok(feature.default),
        })
        .collect()
}

/// Curated required parameters absent from `parameters`, in catalog order.
pub fn missing_required(spec: &DiseaseSpec, parameters: &HashMap<String, f64>) -> Vec<String> {
    spec.required
        .iter()
        .filter(|name| !parameters.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}

/// Numeric parameters coerced from loosely typed JSON input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap(HashMap<String, f64>);

impl ParameterMap {
    /// Accepts an object whose values are numbers, numeric strings or
    /// booleans (true = 1, false = 0).
    pub fn from_json(value: &Value) -> Result<Self, PredictionError> {
        let object = value
            .as_object()
            .ok_or_else(|| PredictionError::MalformedParameter {
                name: "parameters".into(),
                value: value.to_string(),
            })?;

        let mut parameters = HashMap::with_capacity(object.len());
        for (name, raw) in object {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            };
            match number {
                Some(v) if v.is_finite() => {
                    parameters.insert(name.clone(), v);
                }
                _ => {
                    return Err(PredictionError::MalformedParameter {
                        name: name.clone(),
                        value: raw.to_string(),
                    })
                }
            }
        }
        Ok(Self(parameters))
    }

    pub fn as_map(&self) -> &HashMap<String, f64> {
        &self.0
    }

    pub fn into_inner(self) -> HashMap<String, f64> {
        self.0
    }
}
