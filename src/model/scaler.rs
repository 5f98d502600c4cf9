//! Feature scalers

use serde::{Deserialize, Serialize};

use super::{check_shape, InferenceError, Scaler};

/// Z-score scaling: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (never zero)
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        StandardScaler { mean, scale }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("standard scaler has no features".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("mean contains non-finite values".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("scale must be finite and non-zero".to_string());
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_shape(self.mean.len(), row)?;
        if self.scale.len() != self.mean.len() {
            return Err(InferenceError::Invalid(
                "scaler mean/scale length mismatch".to_string(),
            ));
        }

        let scaled: Vec<f64> = row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect();

        if scaled.iter().all(|v| v.is_finite()) {
            Ok(scaled)
        } else {
            Err(InferenceError::NonFinite)
        }
    }

    fn describe(&self) -> String {
        format!("standard ({} features)", self.mean.len())
    }
}

/// Range scaling to [0, 1] over the training data range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Self {
        MinMaxScaler { data_min, data_max }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.data_min.is_empty() {
            return Err("min-max scaler has no features".to_string());
        }
        if self.data_min.len() != self.data_max.len() {
            return Err(format!(
                "data_min has {} entries but data_max has {}",
                self.data_min.len(),
                self.data_max.len()
            ));
        }
        for (lo, hi) in self.data_min.iter().zip(&self.data_max) {
            if !lo.is_finite() || !hi.is_finite() {
                return Err("range bounds must be finite".to_string());
            }
            if lo > hi {
                return Err(format!("data_min {} exceeds data_max {}", lo, hi));
            }
        }
        Ok(())
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_shape(self.data_min.len(), row)?;
        if self.data_max.len() != self.data_min.len() {
            return Err(InferenceError::Invalid(
                "scaler min/max length mismatch".to_string(),
            ));
        }

        let scaled: Vec<f64> = row
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(x, (lo, hi))| {
                let range = hi - lo;
                // Constant feature in training data
                if range > 0.0 {
                    (x - lo) / range
                } else {
                    0.0
                }
            })
            .collect();

        if scaled.iter().all(|v| v.is_finite()) {
            Ok(scaled)
        } else {
            Err(InferenceError::NonFinite)
        }
    }

    fn describe(&self) -> String {
        format!("min_max ({} features)", self.data_min.len())
    }
}

/// Any scaler that can be read from an artifact file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerKind {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerKind {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScalerKind::Standard(s) => s.validate(),
            ScalerKind::MinMax(s) => s.validate(),
        }
    }
}

impl Scaler for ScalerKind {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        match self {
            ScalerKind::Standard(s) => s.transform(row),
            ScalerKind::MinMax(s) => s.transform(row),
        }
    }

    fn describe(&self) -> String {
        match self {
            ScalerKind::Standard(s) => s.describe(),
            ScalerKind::MinMax(s) => s.describe(),
        }
    }
}
