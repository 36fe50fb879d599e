// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Partition tasks ("compute steps") and the activity state they read.
//!
//! A [`ComputeStep`] owns one partition for one superstep: an exclusive view
//! of that partition's value slots, shared read access to the previous
//! round's [`ActivityState`], and shared send access to the mailboxes. Its
//! effects on the activity state go into the running worker's private
//! [`StepOutcome`], never into a shared bit-vector.

use crate::bitset::BitSet;
use crate::computation::{ComputeContext, Computation, InitContext, Messages};
use crate::error::{ComputeError, PregelError};
use crate::graph::{GraphView, NodeId};
use crate::messenger::Messenger;
use crate::partition::Partition;
use crate::termination::TerminationFlag;
use crate::values::PartitionValues;

/// Global activity after a superstep barrier.
#[derive(Clone, Debug)]
pub(crate) struct ActivityState {
    /// Nodes that were sent mail during the superstep.
    pub(crate) received: BitSet,
    /// Nodes that are dormant after the superstep.
    pub(crate) halted: BitSet,
}

impl ActivityState {
    /// Superstep 0: nobody has mail and nobody has halted, so every node
    /// computes.
    pub(crate) fn initial(node_count: usize) -> Self {
        Self {
            received: BitSet::new(node_count),
            halted: BitSet::new(node_count),
        }
    }

    /// A node computes if it has mail or has not voted to halt.
    #[inline]
    pub(crate) fn is_eligible(&self, node: NodeId) -> bool {
        self.received.get(node) || !self.halted.get(node)
    }

    /// OR-reduces per-worker outcomes after the join barrier.
    pub(crate) fn merge(node_count: usize, outcomes: Vec<StepOutcome>) -> Self {
        let mut next = Self::initial(node_count);
        for outcome in outcomes {
            next.received.union_with(&outcome.sent);
            next.halted.union_with(&outcome.halted);
        }
        next
    }
}

/// Private effects accumulated by one worker across the steps it ran.
#[derive(Debug)]
pub(crate) struct StepOutcome {
    /// Targets of every message sent.
    pub(crate) sent: BitSet,
    /// Owned nodes that are dormant after this superstep.
    pub(crate) halted: BitSet,
    /// Number of compute invocations.
    pub(crate) computed: usize,
    /// Cancellation was observed before every owned node was visited.
    pub(crate) interrupted: bool,
}

impl StepOutcome {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            sent: BitSet::new(node_count),
            halted: BitSet::new(node_count),
            computed: 0,
            interrupted: false,
        }
    }
}

/// A compute call failed.
#[derive(Debug)]
pub(crate) struct StepFault {
    pub(crate) node: NodeId,
    pub(crate) superstep: usize,
    pub(crate) source: ComputeError,
}

impl From<StepFault> for PregelError {
    fn from(fault: StepFault) -> Self {
        Self::Compute {
            node: fault.node,
            superstep: fault.superstep,
            source: fault.source,
        }
    }
}

/// One partition's work for one superstep.
pub(crate) struct ComputeStep<'a, G, C>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    pub(crate) superstep: usize,
    pub(crate) partition: Partition,
    pub(crate) values: PartitionValues<'a>,
    pub(crate) graph: &'a G,
    pub(crate) computation: &'a C,
    pub(crate) messenger: &'a Messenger,
    pub(crate) activity: &'a ActivityState,
    pub(crate) termination: &'a TerminationFlag,
}

impl<G, C> ComputeStep<'_, G, C>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    /// Visits every node of the partition.
    ///
    /// `inbox` is a scratch buffer reused across nodes and steps.
    pub(crate) fn run(
        mut self,
        outcome: &mut StepOutcome,
        inbox: &mut Vec<f64>,
    ) -> Result<(), StepFault> {
        let mut cursor = self.graph.concurrent_copy();
        let node_count = outcome.sent.capacity();
        let superstep = self.superstep;
        let synchronous = self.computation.is_synchronous();
        let direction = self.computation.direction();
        let round_isolated = self.messenger.is_round_isolated();

        for node in self.partition.nodes() {
            if !self.activity.is_eligible(node) {
                // Dormant and unmessaged: stays halted.
                outcome.halted.set(node);
                continue;
            }
            if !self.termination.running() {
                outcome.interrupted = true;
                return Ok(());
            }

            let value = self.values.slot_mut(node);
            if superstep == 0 {
                let mut init = InitContext::new(node, node_count, direction, value, &mut cursor);
                self.computation.init(&mut init);
            }

            inbox.clear();
            if superstep > 0 && (!round_isolated || self.activity.received.get(node)) {
                self.messenger.drain_into(node, inbox);
            }

            let mut ctx = ComputeContext::new(
                node,
                superstep,
                synchronous,
                direction,
                value,
                &mut cursor,
                self.messenger,
                &mut outcome.sent,
            );
            self.computation
                .compute(&mut ctx, Messages::new(inbox))
                .map_err(|source| StepFault {
                    node,
                    superstep,
                    source,
                })?;
            let voted = ctx.voted_to_halt();

            if voted {
                outcome.halted.set(node);
            }
            outcome.computed += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_activity_makes_everyone_eligible() {
        let activity = ActivityState::initial(5);
        assert!((0..5).all(|n| activity.is_eligible(n)));
    }

    #[test]
    fn mail_overrides_a_halt_vote() {
        let mut activity = ActivityState::initial(3);
        activity.halted.set(0);
        activity.halted.set(1);
        activity.received.set(1);
        assert!(!activity.is_eligible(0));
        assert!(activity.is_eligible(1));
        assert!(activity.is_eligible(2));
    }

    #[test]
    fn merge_unions_worker_outcomes() {
        let mut a = StepOutcome::new(4);
        let mut b = StepOutcome::new(4);
        a.sent.set(3);
        a.halted.set(0);
        b.sent.set(1);
        b.halted.set(2);
        let merged = ActivityState::merge(4, vec![a, b]);
        assert_eq!(merged.received.iter_ones().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(merged.halted.iter_ones().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn merge_of_no_outcomes_is_silent() {
        let merged = ActivityState::merge(2, Vec::new());
        assert!(merged.received.is_clear());
    }
}
