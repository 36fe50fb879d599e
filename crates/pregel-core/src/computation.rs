// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The algorithm-author contract.
//!
//! A [`Computation`] is stateless per node: the engine calls
//! [`Computation::compute`] once per active node per superstep, and everything
//! a node may observe or change goes through the [`ComputeContext`] it is
//! handed. The context is bound to one node, so a compute call can only
//! write its own value slot.
//!
//! Node lifecycle across a run:
//!
//! ```text
//!  superstep 0          vote_to_halt()            message arrives
//!  ──────────► ACTIVE ─────────────────► DORMANT ─────────────────► ACTIVE
//! ```

use crate::bitset::BitSet;
use crate::error::ComputeError;
use crate::graph::{Direction, NodeId, RelationshipCursor};
use crate::messenger::{Messenger, Reducer};
use crate::values::NodeValues;

/// Per-node logic plus the knobs that select engine behaviour.
///
/// Implementations are shared by reference across worker threads, hence
/// `Sync`. Any per-run state a computation keeps (counters, probes) must be
/// internally synchronized.
pub trait Computation: Sync {
    /// Value every node starts with when no initial values are supplied.
    fn default_node_value(&self) -> f64 {
        0.0
    }

    /// Whether messages must be isolated per superstep.
    ///
    /// Asynchronous computations see every message queued for them at the
    /// time they are computed, including mail sent in the same superstep.
    fn is_synchronous(&self) -> bool {
        true
    }

    /// Optional combiner applied at send time. When set, a node sees at most
    /// one (folded) message per superstep.
    fn reducer(&self) -> Option<Reducer> {
        None
    }

    /// Direction used by neighbour traversal and `send_to_neighbors`.
    fn direction(&self) -> Direction {
        Direction::Outgoing
    }

    /// Called once per node at the start of superstep 0, before `compute`.
    fn init(&self, _ctx: &mut InitContext<'_>) {}

    /// Called once per active node per superstep.
    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        messages: Messages<'_>,
    ) -> Result<(), ComputeError>;

    /// Called on the orchestrator thread after every superstep barrier.
    /// Returning `true` ends the run as converged.
    fn master_compute(&self, _ctx: &MasterContext<'_>) -> bool {
        false
    }
}

/// Messages delivered to a node in the current superstep.
///
/// Arrival order is unspecified; fold them with an order-insensitive
/// operation.
#[derive(Clone, Debug)]
pub struct Messages<'a> {
    inner: std::slice::Iter<'a, f64>,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(messages: &'a [f64]) -> Self {
        Self {
            inner: messages.iter(),
        }
    }

    /// Returns `true` if no (remaining) message is pending.
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// The remaining messages as a slice.
    pub fn as_slice(&self) -> &'a [f64] {
        self.inner.as_slice()
    }
}

impl Iterator for Messages<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Messages<'_> {}

/// Handle given to [`Computation::init`].
pub struct InitContext<'a> {
    node: NodeId,
    node_count: usize,
    direction: Direction,
    value: &'a mut f64,
    cursor: &'a mut dyn RelationshipCursor,
}

impl<'a> InitContext<'a> {
    pub(crate) fn new(
        node: NodeId,
        node_count: usize,
        direction: Direction,
        value: &'a mut f64,
        cursor: &'a mut dyn RelationshipCursor,
    ) -> Self {
        Self {
            node,
            node_count,
            direction,
            value,
            cursor,
        }
    }

    /// The node being initialized.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Degree of this node in the computation's direction.
    pub fn degree(&self) -> usize {
        self.cursor.degree(self.node, self.direction)
    }

    /// Current value (initial value or default).
    pub fn value(&self) -> f64 {
        *self.value
    }

    /// Overwrites this node's value.
    pub fn set_value(&mut self, value: f64) {
        *self.value = value;
    }
}

/// Handle given to [`Computation::compute`], bound to one node.
pub struct ComputeContext<'a> {
    node: NodeId,
    superstep: usize,
    node_count: usize,
    synchronous: bool,
    direction: Direction,
    value: &'a mut f64,
    cursor: &'a mut dyn RelationshipCursor,
    messenger: &'a Messenger,
    sent: &'a mut BitSet,
    voted_to_halt: bool,
}

impl<'a> ComputeContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        node: NodeId,
        superstep: usize,
        synchronous: bool,
        direction: Direction,
        value: &'a mut f64,
        cursor: &'a mut dyn RelationshipCursor,
        messenger: &'a Messenger,
        sent: &'a mut BitSet,
    ) -> Self {
        let node_count = sent.capacity();
        Self {
            node,
            superstep,
            node_count,
            synchronous,
            direction,
            value,
            cursor,
            messenger,
            sent,
            voted_to_halt: false,
        }
    }

    /// Current superstep, starting at 0.
    pub fn superstep(&self) -> usize {
        self.superstep
    }

    /// Returns `true` during superstep 0.
    pub fn is_initial_superstep(&self) -> bool {
        self.superstep == 0
    }

    /// The node being computed.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Whether the run isolates messages per superstep.
    pub fn is_synchronous(&self) -> bool {
        self.synchronous
    }

    /// Degree of this node in the computation's direction.
    pub fn degree(&self) -> usize {
        self.cursor.degree(self.node, self.direction)
    }

    /// This node's value.
    pub fn value(&self) -> f64 {
        *self.value
    }

    /// Overwrites this node's value.
    pub fn set_value(&mut self, value: f64) {
        *self.value = value;
    }

    /// Sends `message` to an arbitrary node.
    pub fn send_to(&mut self, target: NodeId, message: f64) -> Result<(), ComputeError> {
        if target >= self.node_count {
            return Err(ComputeError::UnknownTarget {
                target,
                node_count: self.node_count,
            });
        }
        self.messenger.send(target, message);
        self.sent.set(target);
        Ok(())
    }

    /// Sends `message` along every relationship in the computation's
    /// direction.
    pub fn send_to_neighbors(&mut self, message: f64) {
        self.send_to_neighbors_weighted(|_| message);
    }

    /// Sends `message(weight)` along every relationship in the computation's
    /// direction.
    pub fn send_to_neighbors_weighted(&mut self, mut message: impl FnMut(f64) -> f64) {
        let messenger = self.messenger;
        let sent = &mut *self.sent;
        self.cursor
            .for_each_relationship(self.node, self.direction, &mut |target, weight| {
                messenger.send(target, message(weight));
                sent.set(target);
            });
    }

    /// Visits `(neighbor, weight)` for every relationship in the
    /// computation's direction.
    pub fn for_each_neighbor(&mut self, mut visit: impl FnMut(NodeId, f64)) {
        self.cursor
            .for_each_relationship(self.node, self.direction, &mut |target, weight| {
                visit(target, weight);
            });
    }

    /// Marks this node dormant until it receives a message.
    pub fn vote_to_halt(&mut self) {
        self.voted_to_halt = true;
    }

    pub(crate) fn voted_to_halt(&self) -> bool {
        self.voted_to_halt
    }
}

/// Read-only handle given to [`Computation::master_compute`].
pub struct MasterContext<'a> {
    superstep: usize,
    values: &'a NodeValues,
    messaged_nodes: usize,
    halted_nodes: usize,
}

impl<'a> MasterContext<'a> {
    pub(crate) fn new(
        superstep: usize,
        values: &'a NodeValues,
        messaged_nodes: usize,
        halted_nodes: usize,
    ) -> Self {
        Self {
            superstep,
            values,
            messaged_nodes,
            halted_nodes,
        }
    }

    /// The superstep that just completed.
    pub fn superstep(&self) -> usize {
        self.superstep
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.values.len()
    }

    /// All node values after the superstep.
    pub fn values(&self) -> &'a NodeValues {
        self.values
    }

    /// Nodes that were sent at least one message during the superstep.
    pub fn messaged_nodes(&self) -> usize {
        self.messaged_nodes
    }

    /// Nodes that are dormant after the superstep.
    pub fn halted_nodes(&self) -> usize {
        self.halted_nodes
    }
}
