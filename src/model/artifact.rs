//! On-disk artifact format
//!
//! Every artifact is a JSON document wrapping one scaler or regressor with the
//! metadata needed to reject files written for another role, another feature
//! order, or another format version.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::regressor::RegressorKind;
use super::scaler::ScalerKind;
use crate::Role;

/// Version written by `Artifact::save` and required by `Artifact::load`
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Failure to load a model or scaler artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found at {}", .path.display())]
    Missing { kind: &'static str, path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt artifact {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact {} has format version {found}, expected {expected}", .path.display())]
    IncompatibleVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("Artifact {} was trained for {found}, expected {expected}", .path.display())]
    RoleMismatch {
        path: PathBuf,
        expected: Role,
        found: Role,
    },

    #[error("Artifact {} was fit on features {found:?}, expected {expected:?}", .path.display())]
    FeatureMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid artifact {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// Path of the artifact that failed
    pub fn path(&self) -> &Path {
        match self {
            ArtifactError::Missing { path, .. }
            | ArtifactError::Io { path, .. }
            | ArtifactError::Corrupt { path, .. }
            | ArtifactError::IncompatibleVersion { path, .. }
            | ArtifactError::RoleMismatch { path, .. }
            | ArtifactError::FeatureMismatch { path, .. }
            | ArtifactError::Invalid { path, .. } => path,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::Missing { .. })
    }
}

/// Payload types that can live inside an artifact
pub trait ArtifactBody: Serialize + DeserializeOwned {
    /// Label used in diagnostics ("model", "scaler")
    const KIND: &'static str;

    fn validate(&self) -> Result<(), String>;
}

impl ArtifactBody for ScalerKind {
    const KIND: &'static str = "scaler";

    fn validate(&self) -> Result<(), String> {
        ScalerKind::validate(self)
    }
}

impl ArtifactBody for RegressorKind {
    const KIND: &'static str = "model";

    fn validate(&self) -> Result<(), String> {
        RegressorKind::validate(self)
    }
}

/// Envelope written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact<T> {
    pub format_version: u32,
    pub role: Role,
    pub feature_names: Vec<String>,
    pub artifact: T,
}

impl<T: ArtifactBody> Artifact<T> {
    /// Wrap a payload for a role using the role's declared feature order
    pub fn new(role: Role, artifact: T) -> Self {
        Artifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            role,
            feature_names: role.feature_names().iter().map(|s| s.to_string()).collect(),
            artifact,
        }
    }

    /// Read, check and validate an artifact for `role`
    pub fn load<P: AsRef<Path>>(path: P, role: Role) -> Result<T, ArtifactError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing {
                    kind: T::KIND,
                    path: path.to_path_buf(),
                }
            } else {
                ArtifactError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let envelope: Artifact<T> =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Corrupt {
                path: path.to_path_buf(),
                source: e,
            })?;

        envelope.check(path, role)?;
        Ok(envelope.artifact)
    }

    fn check(&self, path: &Path, role: Role) -> Result<(), ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::IncompatibleVersion {
                path: path.to_path_buf(),
                found: self.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if self.role != role {
            return Err(ArtifactError::RoleMismatch {
                path: path.to_path_buf(),
                expected: role,
                found: self.role,
            });
        }
        let expected = role.feature_names();
        if self.feature_names.len() != expected.len()
            || self.feature_names.iter().zip(expected.iter()).any(|(a, b)| a != b)
        {
            return Err(ArtifactError::FeatureMismatch {
                path: path.to_path_buf(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }
        self.artifact
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason,
            })
    }

    /// Write the artifact as pretty JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let io_err = |e| ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }
}
