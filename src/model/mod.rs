//! Trained model artifacts
//!
//! A bundle pairs a feature scaler with a regressor for one role:
//! - Scalers: z-score (`standard`) and range (`min_max`)
//! - Regressors: `linear` and `forest` (averaged decision trees)

pub mod artifact;
pub mod bundle;
pub mod regressor;
pub mod scaler;

pub use artifact::{Artifact, ArtifactBody, ArtifactError, ARTIFACT_FORMAT_VERSION};
pub use bundle::{ArtifactPaths, ArtifactStore, BundleSource, ModelBundle};
pub use regressor::{DecisionTree, ForestRegressor, LinearRegressor, RegressorKind, TreeNode};
pub use scaler::{MinMaxScaler, ScalerKind, StandardScaler};

use thiserror::Error;

/// Runtime failure while scaling or predicting a row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Shape mismatch: expected {expected} features, got {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Non-finite value produced during inference")]
    NonFinite,

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// Maps a raw feature row into the space the regressor was fit in
pub trait Scaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;

    /// Short human-readable summary
    fn describe(&self) -> String {
        "custom scaler".to_string()
    }
}

/// Predicts a single target value from a scaled row
pub trait Regressor {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError>;

    fn describe(&self) -> String {
        "custom regressor".to_string()
    }
}

fn check_shape(expected: usize, row: &[f64]) -> Result<(), InferenceError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(InferenceError::ShapeMismatch {
            expected,
            found: row.len(),
        })
    }
}
