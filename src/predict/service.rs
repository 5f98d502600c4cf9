//! Prediction service with heuristic fallback

use super::cache::{BundleCache, CacheStatus};
use super::heuristic;
use crate::features::{BatsmanFeatures, BowlerFeatures, FeatureInput, PlayerFeatures, RawFeatures};
use crate::model::{ArtifactError, ArtifactStore, BundleSource};
use crate::{CricketError, ModelsConfig, Prediction, PredictionSource, Result, Role};

/// Predicts batsman runs and bowler wickets.
///
/// Uses the role's trained bundle when it can be loaded from `source`, and the
/// heuristic otherwise. Only invalid inputs are reported as errors; missing or
/// broken artifacts and inference failures fall back silently apart from a
/// log line and the `source` field of [`Prediction`].
pub struct PredictionService<S = ArtifactStore> {
    source: S,
    cache: BundleCache,
}

impl PredictionService<ArtifactStore> {
    /// Service reading artifacts from the configured paths
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self::new(ArtifactStore::from_config(config))
    }
}

impl<S: BundleSource> PredictionService<S> {
    pub fn new(source: S) -> Self {
        PredictionService {
            source,
            cache: BundleCache::new(),
        }
    }

    /// Effective runs for a batsman
    pub fn predict_batsman(
        &mut self,
        balls_faced: impl FeatureInput,
        strike_rate: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<f64> {
        self.predict_batsman_detailed(balls_faced, strike_rate, dot_ball_pct)
            .map(|p| p.value)
    }

    /// Effective wickets for a bowler
    pub fn predict_bowler(
        &mut self,
        overs: impl FeatureInput,
        economy: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<f64> {
        self.predict_bowler_detailed(overs, economy, dot_ball_pct)
            .map(|p| p.value)
    }

    pub fn predict_batsman_detailed(
        &mut self,
        balls_faced: impl FeatureInput,
        strike_rate: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<Prediction> {
        let features = BatsmanFeatures::from_inputs(balls_faced, strike_rate, dot_ball_pct)?;
        Ok(self.predict(features))
    }

    pub fn predict_bowler_detailed(
        &mut self,
        overs: impl FeatureInput,
        economy: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<Prediction> {
        let features = BowlerFeatures::from_inputs(overs, economy, dot_ball_pct)?;
        Ok(self.predict(features))
    }

    /// Predict from already-coerced features. Never fails.
    pub fn predict(&mut self, features: impl Into<PlayerFeatures>) -> Prediction {
        let features = features.into();
        let role = features.role();

        match self.cache.get_or_load(role, &self.source) {
            Some(bundle) => match bundle.predict_row(&features.to_vec()) {
                Ok(value) => {
                    return Prediction {
                        role,
                        value: heuristic::non_negative(value),
                        source: PredictionSource::Model,
                    }
                }
                Err(e) => log::warn!("{} inference failed ({}), using heuristic", role, e),
            },
            None => log::info!("No {} model available, using heuristic", role),
        }

        Prediction {
            role,
            value: heuristic::predict(&features),
            source: PredictionSource::Heuristic,
        }
    }

    /// Predict with the trained bundle only.
    ///
    /// Unlike [`predict`](Self::predict) nothing falls back: a missing
    /// artifact is `NoModel`, any other load problem is `Artifact` and a
    /// failed inference is `Inference`.
    pub fn predict_strict(&mut self, features: impl Into<PlayerFeatures>) -> Result<Prediction> {
        let features = features.into();
        let role = features.role();

        let bundle = self
            .cache
            .try_get_or_load(role, &self.source)
            .map_err(|e| match e {
                ArtifactError::Missing { kind, path } => CricketError::NoModel { role, kind, path },
                other => CricketError::Artifact(other),
            })?;
        let value = bundle.predict_row(&features.to_vec())?;

        Ok(Prediction {
            role,
            value: heuristic::non_negative(value),
            source: PredictionSource::Model,
        })
    }

    /// Predict one batch row given as JSON, e.g. `{"type": "bowler", "overs": 4, ...}`
    pub fn predict_raw(&mut self, row: serde_json::Value) -> Result<Prediction> {
        let features = RawFeatures::from_value(row)?.coerce()?;
        Ok(self.predict(features))
    }

    pub fn status(&self, role: Role) -> CacheStatus {
        self.cache.status(role)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &Prediction, precision: usize) -> String {
    let label = match pred.role {
        Role::Batsman => "Effective runs:   ",
        Role::Bowler => "Effective wickets:",
    };
    let title = match pred.role {
        Role::Batsman => "Batsman prediction",
        Role::Bowler => "Bowler prediction",
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {}
├─────────────────────────────────────────────────┤
│  {} {:.prec$}
│  Source:            {}
└─────────────────────────────────────────────────┘
"#,
        title,
        label,
        pred.value,
        pred.source,
        prec = precision
    )
}
