// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node value store: one `f64` slot per node.
//!
//! During a superstep the store is split into one [`PartitionValues`] per
//! partition with `split_at_mut`, so "exactly one task writes any index" is
//! enforced by the borrow checker rather than by convention.

use crate::graph::NodeId;
use crate::partition::Partition;

/// Per-node values of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeValues {
    values: Vec<f64>,
}

impl NodeValues {
    /// A store of `node_count` slots all set to `value`.
    pub fn filled(node_count: usize, value: f64) -> Self {
        Self {
            values: vec![value; node_count],
        }
    }

    /// Wraps caller-supplied initial values (index = node id).
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of `node`, or `None` if out of range.
    pub fn get(&self, node: NodeId) -> Option<f64> {
        self.values.get(node).copied()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` for an empty store.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of all slots.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Iterates `(node, value)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.values.iter().copied().enumerate()
    }

    /// Unwraps the underlying vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Copies every slot into `buf`, reusing its allocation.
    pub(crate) fn snapshot_into(&self, buf: &mut Vec<f64>) {
        buf.clear();
        buf.extend_from_slice(&self.values);
    }

    /// Overwrites every slot from a [`snapshot_into`](Self::snapshot_into)
    /// buffer of the same length.
    pub(crate) fn restore_from(&mut self, snapshot: &[f64]) {
        self.values.copy_from_slice(snapshot);
    }

    /// Splits the store into one disjoint mutable view per partition.
    ///
    /// `partitions` must have passed
    /// [`validate_partitions`](crate::validate_partitions) against `len()`.
    pub(crate) fn split_partitions<'a>(
        &'a mut self,
        partitions: &[Partition],
    ) -> Vec<PartitionValues<'a>> {
        let mut rest: &'a mut [f64] = &mut self.values;
        let mut views = Vec::with_capacity(partitions.len());
        for p in partitions {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(p.len());
            views.push(PartitionValues {
                start: p.start(),
                slots: head,
            });
            rest = tail;
        }
        views
    }
}

/// Exclusive view over the value slots of one partition.
#[derive(Debug)]
pub(crate) struct PartitionValues<'a> {
    start: NodeId,
    slots: &'a mut [f64],
}

impl PartitionValues<'_> {
    /// Mutable slot of `node`, which must belong to this partition.
    #[inline]
    pub(crate) fn slot_mut(&mut self, node: NodeId) -> &mut f64 {
        &mut self.slots[node - self.start]
    }
}
