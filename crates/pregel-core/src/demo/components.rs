// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Weakly connected components by min-label propagation.

use crate::computation::{ComputeContext, Computation, InitContext, Messages};
use crate::error::ComputeError;
use crate::graph::Direction;
use crate::messenger::Reducer;

/// Labels every node with the smallest node id reachable while ignoring edge
/// direction.
///
/// Uses the [`Reducer::Min`] mailbox, so a node sees at most one message per
/// superstep: the smallest label offered to it. Every node votes to halt
/// after each compute; only label improvements wake neighbours up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectedComponents;

impl Computation for ConnectedComponents {
    fn reducer(&self) -> Option<Reducer> {
        Some(Reducer::Min)
    }

    fn direction(&self) -> Direction {
        Direction::Both
    }

    fn init(&self, ctx: &mut InitContext<'_>) {
        ctx.set_value(ctx.node_id() as f64);
    }

    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        messages: Messages<'_>,
    ) -> Result<(), ComputeError> {
        if ctx.is_initial_superstep() {
            ctx.send_to_neighbors(ctx.value());
        } else {
            let offered = messages.fold(f64::INFINITY, f64::min);
            if offered < ctx.value() {
                ctx.set_value(offered);
                ctx.send_to_neighbors(offered);
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{run, AdjacencyGraph, PregelConfig};

    #[test]
    fn labels_follow_weak_connectivity() {
        // {0,1,2} chained against edge direction, {3,4}, {5} isolated.
        let graph = AdjacencyGraph::from_edges(6, &[(2, 1), (1, 0), (4, 3)]).unwrap();
        let config = PregelConfig::default().with_concurrency(2);
        let result = run(&graph, &ConnectedComponents, None, config).unwrap();
        assert_eq!(
            result.values.as_slice(),
            &[0.0, 0.0, 0.0, 3.0, 3.0, 5.0]
        );
        assert!(result.did_converge);
    }
}
