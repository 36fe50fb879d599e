// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Run configuration.
//!
//! Parsing and user-facing validation belong to the caller (see the
//! `pregel-config` crate). The engine only re-checks the values it cannot run
//! without.

use crate::error::PregelError;
use crate::partition::{Partitioning, MIN_BATCH_SIZE};

/// Superstep budget used by [`PregelConfig::default`].
pub const DEFAULT_MAX_SUPERSTEPS: usize = 20;

/// Knobs consumed by [`crate::Pregel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PregelConfig {
    /// Upper bound on supersteps; must be positive.
    pub max_supersteps: usize,
    /// Worker thread count; must be positive.
    pub concurrency: usize,
    /// Nodes per partition. `None` derives a size from the node count and
    /// concurrency (never below [`MIN_BATCH_SIZE`]).
    pub batch_size: Option<usize>,
    /// Partitioning strategy.
    pub partitioning: Partitioning,
}

impl Default for PregelConfig {
    fn default() -> Self {
        Self {
            max_supersteps: DEFAULT_MAX_SUPERSTEPS,
            concurrency: num_cpus::get(),
            batch_size: None,
            partitioning: Partitioning::Range,
        }
    }
}

impl PregelConfig {
    /// Sets the superstep budget.
    pub fn with_max_supersteps(mut self, max_supersteps: usize) -> Self {
        self.max_supersteps = max_supersteps;
        self
    }

    /// Sets the worker count.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Pins the partition size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Selects the partitioning strategy.
    pub fn with_partitioning(mut self, partitioning: Partitioning) -> Self {
        self.partitioning = partitioning;
        self
    }

    /// Fails fast on values the engine cannot run with.
    pub fn validate(&self) -> Result<(), PregelError> {
        if self.max_supersteps == 0 {
            return Err(PregelError::ZeroMaxSupersteps);
        }
        if self.concurrency == 0 {
            return Err(PregelError::ZeroConcurrency);
        }
        if self.batch_size == Some(0) {
            return Err(PregelError::ZeroBatchSize);
        }
        Ok(())
    }
}
