//! Per-role memoized bundle cache
//!
//! `Unloaded -> Loaded` on the first successful load; a failed load leaves the
//! role in `UnavailableRetry` and the next lookup tries again. `Loaded` is
//! never invalidated.

use serde::Serialize;
use std::fmt;

use crate::model::{ArtifactError, BundleSource, ModelBundle};
use crate::Role;

enum LoadState {
    Unloaded,
    Loaded(ModelBundle),
    UnavailableRetry,
}

/// Observable cache state for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Unloaded,
    Loaded,
    UnavailableRetry,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStatus::Unloaded => write!(f, "not loaded"),
            CacheStatus::Loaded => write!(f, "loaded"),
            CacheStatus::UnavailableRetry => write!(f, "unavailable (will retry)"),
        }
    }
}

pub struct BundleCache {
    batsman: LoadState,
    bowler: LoadState,
}

impl Default for BundleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleCache {
    pub fn new() -> Self {
        BundleCache {
            batsman: LoadState::Unloaded,
            bowler: LoadState::Unloaded,
        }
    }

    fn slot(&self, role: Role) -> &LoadState {
        match role {
            Role::Batsman => &self.batsman,
            Role::Bowler => &self.bowler,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut LoadState {
        match role {
            Role::Batsman => &mut self.batsman,
            Role::Bowler => &mut self.bowler,
        }
    }

    /// Return the cached bundle, loading it from `source` if not yet loaded
    pub fn get_or_load<S: BundleSource + ?Sized>(
        &mut self,
        role: Role,
        source: &S,
    ) -> Option<&ModelBundle> {
        self.try_get_or_load(role, source).ok()
    }

    /// Like [`get_or_load`](Self::get_or_load), but hands back the load error
    pub fn try_get_or_load<S: BundleSource + ?Sized>(
        &mut self,
        role: Role,
        source: &S,
    ) -> Result<&ModelBundle, ArtifactError> {
        let slot = self.slot_mut(role);

        if !matches!(*slot, LoadState::Loaded(_)) {
            match source.load(role) {
                Ok(bundle) => {
                    log::info!("Loaded {} model: {}", role, bundle.describe());
                    *slot = LoadState::Loaded(bundle);
                }
                Err(e) => {
                    log::debug!("{} model unavailable: {}", role, e);
                    *slot = LoadState::UnavailableRetry;
                    return Err(e);
                }
            }
        }

        match &*slot {
            LoadState::Loaded(bundle) => Ok(bundle),
            LoadState::Unloaded | LoadState::UnavailableRetry => {
                unreachable!("{} slot is loaded at this point", role)
            }
        }
    }

    pub fn status(&self, role: Role) -> CacheStatus {
        match self.slot(role) {
            LoadState::Unloaded => CacheStatus::Unloaded,
            LoadState::Loaded(_) => CacheStatus::Loaded,
            LoadState::UnavailableRetry => CacheStatus::UnavailableRetry,
        }
    }
}
