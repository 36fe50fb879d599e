// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rank propagation over outgoing relationships.

use crate::computation::{ComputeContext, Computation, InitContext, Messages};
use crate::error::ComputeError;

/// Damping factor used by [`PageRank::default`].
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;

/// Normalized PageRank.
///
/// Every node starts at `1 / N`. From superstep 1 on, a node's rank is
/// `(1 - d) / N + d * sum(incoming shares)`, and each node sends
/// `rank / out_degree` along its outgoing relationships. Nodes never vote to
/// halt, so the run lasts exactly `max_supersteps` (unless the graph has no
/// relationships at all).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRank {
    damping: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self::new(DEFAULT_DAMPING_FACTOR)
    }
}

impl PageRank {
    /// Rank propagation with damping factor `damping` (typically `0.85`).
    pub fn new(damping: f64) -> Self {
        Self { damping }
    }

    /// The configured damping factor.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    fn base(&self, node_count: usize) -> f64 {
        (1.0 - self.damping) / node_count as f64
    }
}

impl Computation for PageRank {
    fn init(&self, ctx: &mut InitContext<'_>) {
        ctx.set_value(1.0 / ctx.node_count() as f64);
    }

    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        messages: Messages<'_>,
    ) -> Result<(), ComputeError> {
        if !ctx.is_initial_superstep() {
            let sum: f64 = messages.sum();
            ctx.set_value(self.base(ctx.node_count()) + self.damping * sum);
        }
        let degree = ctx.degree();
        if degree > 0 {
            ctx.send_to_neighbors(ctx.value() / degree as f64);
        }
        Ok(())
    }
}
