//! Scaler + regressor bundles and where to load them from

use std::path::{Path, PathBuf};

use super::artifact::{Artifact, ArtifactError};
use super::regressor::RegressorKind;
use super::scaler::ScalerKind;
use super::{InferenceError, Regressor, Scaler};
use crate::{ModelsConfig, Role};

/// Model and scaler file locations for one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside a models directory
    pub fn in_dir<P: AsRef<Path>>(dir: P, role: Role) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            model: dir.join(format!("{}_model.json", role)),
            scaler: dir.join(format!("{}_scaler.json", role)),
        }
    }

    pub fn both_exist(&self) -> bool {
        self.model.exists() && self.scaler.exists()
    }
}

/// A trained regressor and the scaler it was fit behind
pub struct ModelBundle {
    scaler: Box<dyn Scaler>,
    regressor: Box<dyn Regressor>,
}

impl ModelBundle {
    pub fn new(scaler: impl Scaler + 'static, regressor: impl Regressor + 'static) -> Self {
        ModelBundle {
            scaler: Box::new(scaler),
            regressor: Box::new(regressor),
        }
    }

    /// Load both artifacts for a role. Fails if either is unavailable.
    pub fn load(role: Role, paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let regressor = Artifact::<RegressorKind>::load(&paths.model, role)?;
        let scaler = Artifact::<ScalerKind>::load(&paths.scaler, role)?;
        Ok(ModelBundle::new(scaler, regressor))
    }

    /// Scale a single row and run the regressor on it
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let scaled = self.scaler.transform(row)?;
        let value = self.regressor.predict(&scaled)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(InferenceError::NonFinite)
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} behind {} scaler",
            self.regressor.describe(),
            self.scaler.describe()
        )
    }
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("scaler", &self.scaler.describe())
            .field("regressor", &self.regressor.describe())
            .finish()
    }
}

/// Somewhere bundles can be loaded from
pub trait BundleSource {
    fn load(&self, role: Role) -> Result<ModelBundle, ArtifactError>;
}

impl<F> BundleSource for F
where
    F: Fn(Role) -> Result<ModelBundle, ArtifactError>,
{
    fn load(&self, role: Role) -> Result<ModelBundle, ArtifactError> {
        self(role)
    }
}

/// Filesystem bundle source
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    batsman: ArtifactPaths,
    bowler: ArtifactPaths,
}

impl ArtifactStore {
    pub fn new(batsman: ArtifactPaths, bowler: ArtifactPaths) -> Self {
        ArtifactStore { batsman, bowler }
    }

    pub fn from_config(config: &ModelsConfig) -> Self {
        ArtifactStore {
            batsman: config.paths(Role::Batsman),
            bowler: config.paths(Role::Bowler),
        }
    }

    /// Default file names inside one directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        ArtifactStore {
            batsman: ArtifactPaths::in_dir(&dir, Role::Batsman),
            bowler: ArtifactPaths::in_dir(&dir, Role::Bowler),
        }
    }

    pub fn paths(&self, role: Role) -> &ArtifactPaths {
        match role {
            Role::Batsman => &self.batsman,
            Role::Bowler => &self.bowler,
        }
    }
}

impl BundleSource for ArtifactStore {
    fn load(&self, role: Role) -> Result<ModelBundle, ArtifactError> {
        let paths = self.paths(role);
        log::debug!(
            "Loading {} bundle from {} and {}",
            role,
            paths.model.display(),
            paths.scaler.display()
        );
        ModelBundle::load(role, paths)
    }
}
