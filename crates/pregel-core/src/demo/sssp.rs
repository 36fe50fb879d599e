// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-source shortest paths over weighted outgoing relationships.

use crate::computation::{ComputeContext, Computation, InitContext, Messages};
use crate::error::ComputeError;
use crate::graph::NodeId;

/// Bellman-Ford style distance relaxation from one source node.
///
/// Unreached nodes keep `f64::INFINITY`. Weights are taken as stored;
/// negative cycles make the run exhaust its superstep budget instead of
/// converging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShortestPaths {
    source: NodeId,
}

impl ShortestPaths {
    /// Distances from `source`.
    pub fn new(source: NodeId) -> Self {
        Self { source }
    }

    /// The source node.
    pub fn source(&self) -> NodeId {
        self.source
    }
}

impl Computation for ShortestPaths {
    fn default_node_value(&self) -> f64 {
        f64::INFINITY
    }

    fn init(&self, ctx: &mut InitContext<'_>) {
        if ctx.node_id() == self.source {
            ctx.set_value(0.0);
        }
    }

    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        messages: Messages<'_>,
    ) -> Result<(), ComputeError> {
        if ctx.is_initial_superstep() {
            if self.source >= ctx.node_count() {
                return Err(ComputeError::UnknownTarget {
                    target: self.source,
                    node_count: ctx.node_count(),
                });
            }
            if ctx.node_id() == self.source {
                ctx.send_to_neighbors_weighted(|weight| weight);
            }
        } else {
            let candidate = messages.fold(f64::INFINITY, f64::min);
            if candidate < ctx.value() {
                ctx.set_value(candidate);
                ctx.send_to_neighbors_weighted(|weight| candidate + weight);
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }
}
