//! Cricket player performance prediction
//!
//! Forecasts batsman effective runs and bowler effective wickets from three
//! hand-picked features, using a trained scaler/regressor pair when one is on
//! disk and a closed-form heuristic otherwise.

pub mod features;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::{ArtifactError, ArtifactPaths, InferenceError};

/// Player role a model is trained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Batsman,
    Bowler,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Batsman, Role::Bowler];

    /// Feature names in the order the scaler and regressor were fit on
    pub fn feature_names(&self) -> &'static [&'static str; 3] {
        match self {
            Role::Batsman => &["balls_faced", "strike_rate", "dot_ball_pct"],
            Role::Bowler => &["overs", "economy", "dot_ball_pct"],
        }
    }

    /// Regression target produced upstream by the cleaning pipeline
    pub fn target(&self) -> &'static str {
        match self {
            Role::Batsman => "effective_runs",
            Role::Bowler => "effective_wickets",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batsman => "batsman",
            Role::Bowler => "bowler",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batsman" => Ok(Role::Batsman),
            "bowler" => Ok(Role::Bowler),
            _ => Err(format!("Unknown role: {}. Use batsman or bowler.", s)),
        }
    }
}

/// Where a prediction value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Model,
    Heuristic,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::Model => write!(f, "model"),
            PredictionSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub role: Role,
    /// Effective runs (batsman) or effective wickets (bowler), finite and >= 0
    pub value: f64,
    pub source: PredictionSource,
}

impl Prediction {
    pub fn is_heuristic(&self) -> bool {
        self.source == PredictionSource::Heuristic
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum CricketError {
    #[error("Invalid input for {field}: {value:?} is not a finite number")]
    InvalidInput { field: &'static str, value: String },

    #[error("No {role} {kind} available at {} - train and export the {role} artifacts first", .path.display())]
    NoModel {
        role: Role,
        kind: &'static str,
        path: PathBuf,
    },

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CricketError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub dir: String,
    pub batsman_model: String,
    pub batsman_scaler: String,
    pub bowler_model: String,
    pub bowler_scaler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Fall back to the heuristic in the CLI instead of failing on missing artifacts
    pub allow_heuristic: bool,
    /// Decimal places in printed predictions
    pub precision: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        ModelsConfig {
            dir: "models".to_string(),
            batsman_model: "batsman_model.json".to_string(),
            batsman_scaler: "batsman_scaler.json".to_string(),
            bowler_model: "bowler_model.json".to_string(),
            bowler_scaler: "bowler_scaler.json".to_string(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        PredictionConfig {
            allow_heuristic: false,
            precision: 2,
        }
    }
}

impl ModelsConfig {
    /// Resolve the model and scaler paths for a role
    pub fn paths(&self, role: Role) -> ArtifactPaths {
        let dir = PathBuf::from(&self.dir);
        let (model, scaler) = match role {
            Role::Batsman => (&self.batsman_model, &self.batsman_scaler),
            Role::Bowler => (&self.bowler_model, &self.bowler_scaler),
        };
        ArtifactPaths {
            model: dir.join(model),
            scaler: dir.join(scaler),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CricketError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CricketError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CricketError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("batsman".parse::<Role>().unwrap(), Role::Batsman);
        assert_eq!("BOWLER".parse::<Role>().unwrap(), Role::Bowler);
        assert!("keeper".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_feature_order() {
        assert_eq!(
            Role::Batsman.feature_names(),
            &["balls_faced", "strike_rate", "dot_ball_pct"]
        );
        assert_eq!(Role::Bowler.feature_names(), &["overs", "economy", "dot_ball_pct"]);
    }

    #[test]
    fn test_default_paths() {
        let models = ModelsConfig::default();
        let paths = models.paths(Role::Bowler);
        assert_eq!(paths.model, PathBuf::from("models").join("bowler_model.json"));
        assert_eq!(paths.scaler, PathBuf::from("models").join("bowler_scaler.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.models.dir = "artifacts".to_string();
        config.prediction.allow_heuristic = true;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[prediction]\nallow_heuristic = true\nprecision = 3\n").unwrap();
        assert_eq!(config.models, ModelsConfig::default());
        assert!(config.prediction.allow_heuristic);
        assert_eq!(config.prediction.precision, 3);
    }

    #[test]
    fn test_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "models = [").unwrap();
        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CricketError::Config(_)));
    }
}
