// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Named run profiles.
//!
//! A profile bundles the engine knobs with the choice of demo computation and
//! its parameters, so a tuned setup can be replayed by name:
//!
//! ```json
//! {
//!   "algorithm": "page-rank",
//!   "damping": 0.85,
//!   "source": 0,
//!   "engine": { "max_supersteps": 30, "concurrency": 8, "batch_size": null, "partitioning": "degree" }
//! }
//! ```

use pregel_core::demo::DEFAULT_DAMPING_FACTOR;
use pregel_core::{NodeId, PregelConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, ConfigService, ConfigStore};

/// Demo computation selected by a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Rank propagation.
    #[default]
    PageRank,
    /// Weakly connected components.
    Components,
    /// Single-source shortest paths.
    #[serde(rename = "sssp")]
    ShortestPaths,
}

/// A named, serializable set of run settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProfile {
    /// Which computation to run.
    pub algorithm: Algorithm,
    /// Damping factor for [`Algorithm::PageRank`].
    pub damping: f64,
    /// Source node for [`Algorithm::ShortestPaths`].
    pub source: NodeId,
    /// Engine configuration.
    pub engine: PregelConfig,
}

impl Default for RunProfile {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            damping: DEFAULT_DAMPING_FACTOR,
            source: 0,
            engine: PregelConfig::default(),
        }
    }
}

impl From<RunProfile> for PregelConfig {
    fn from(profile: RunProfile) -> Self {
        profile.engine
    }
}

impl RunProfile {
    /// Store key for the profile called `name`.
    pub fn key(name: &str) -> String {
        format!("profiles/{name}")
    }

    /// Loads the profile called `name`; `Ok(None)` if it was never saved.
    pub fn load<S: ConfigStore>(
        service: &ConfigService<S>,
        name: &str,
    ) -> Result<Option<Self>, ConfigError> {
        let profile: Option<Self> = service.load(&Self::key(name))?;
        if let Some(profile) = &profile {
            profile.validate()?;
        }
        Ok(profile)
    }

    /// Validates and saves this profile under `name`.
    pub fn save<S: ConfigStore>(
        &self,
        service: &ConfigService<S>,
        name: &str,
    ) -> Result<(), ConfigError> {
        self.validate()?;
        service.save(&Self::key(name), self)?;
        debug!(name, algorithm = ?self.algorithm, "profile saved");
        Ok(())
    }

    /// Rejects settings no run could start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::Other(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::Other(format!(
                "damping factor {} is outside 0..=1",
                self.damping
            )));
        }
        Ok(())
    }
}
