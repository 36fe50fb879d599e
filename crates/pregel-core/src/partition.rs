// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node-space partitioning.
//!
//! A partition is a contiguous, half-open range of node ids. Partitions of one
//! run are ascending, disjoint and cover `0..node_count`; this shape is what
//! lets the orchestrator hand every partition task its own `&mut` slice of
//! the node value store.

use std::ops::Range;

use crate::error::PregelError;
use crate::graph::{Direction, NodeId, RelationshipCursor};

/// Lower bound for derived batch sizes. Smaller batches cost more in task
/// bookkeeping than they win in balance.
pub const MIN_BATCH_SIZE: usize = 64;

/// Target number of partitions per worker when deriving a batch size.
const PARTITIONS_PER_WORKER: usize = 4;

/// How the node-id space is cut into partitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Partitioning {
    /// Fixed-size ranges of `batch_size` nodes.
    #[default]
    Range,
    /// Ranges with roughly equal `node + degree` cost.
    Degree,
}

/// A contiguous batch of node ids owned by one partition task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    start: NodeId,
    len: usize,
}

impl Partition {
    /// Creates the partition `start..start + len`.
    pub fn new(start: NodeId, len: usize) -> Self {
        Self { start, len }
    }

    /// First node id.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// One past the last node id.
    pub fn end(&self) -> NodeId {
        self.start + self.len
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an empty partition.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `node` belongs to this partition.
    pub fn contains(&self, node: NodeId) -> bool {
        (self.start..self.end()).contains(&node)
    }

    /// The node ids of this partition.
    pub fn nodes(&self) -> Range<NodeId> {
        self.start..self.end()
    }
}

/// Derives the batch size for a run.
///
/// An explicit `configured` size wins. Otherwise the node space is cut into
/// about four partitions per worker, never smaller than [`MIN_BATCH_SIZE`].
pub fn batch_size_for(node_count: usize, concurrency: usize, configured: Option<usize>) -> usize {
    configured.unwrap_or_else(|| {
        let target = concurrency.max(1) * PARTITIONS_PER_WORKER;
        node_count.div_ceil(target).max(MIN_BATCH_SIZE)
    })
}

/// Cuts `0..node_count` into ranges of `batch_size` nodes (the last may be
/// shorter).
pub fn range_partitions(node_count: usize, batch_size: usize) -> Vec<Partition> {
    let batch = batch_size.max(1);
    (0..node_count)
        .step_by(batch)
        .map(|start| Partition::new(start, batch.min(node_count - start)))
        .collect()
}

/// Cuts `0..node_count` into ranges of roughly equal traversal cost.
///
/// Each node costs `1 + degree(node, direction)`. The number of partitions
/// matches what [`range_partitions`] would produce for `batch_size`, but
/// boundaries move so that hub nodes do not pile up in one batch.
pub fn degree_partitions<C>(
    node_count: usize,
    cursor: &C,
    direction: Direction,
    batch_size: usize,
) -> Vec<Partition>
where
    C: RelationshipCursor + ?Sized,
{
    if node_count == 0 {
        return Vec::new();
    }
    let cost = |node: NodeId| 1 + cursor.degree(node, direction);
    let total: usize = (0..node_count).map(cost).sum();
    let batches = node_count.div_ceil(batch_size.max(1));
    let budget = total.div_ceil(batches).max(1);

    let mut partitions = Vec::with_capacity(batches);
    let mut start = 0;
    let mut acc = 0;
    for node in 0..node_count {
        acc += cost(node);
        if acc >= budget {
            partitions.push(Partition::new(start, node + 1 - start));
            start = node + 1;
            acc = 0;
        }
    }
    if start < node_count {
        partitions.push(Partition::new(start, node_count - start));
    }
    partitions
}

/// Checks that `partitions` are ascending, contiguous, non-overlapping and
/// cover exactly `0..node_count`.
pub fn validate_partitions(partitions: &[Partition], node_count: usize) -> Result<(), PregelError> {
    let mut expected_start = 0;
    for (idx, p) in partitions.iter().enumerate() {
        if p.start() != expected_start {
            return Err(PregelError::InvalidPartitions(format!(
                "partition {idx} starts at {} but {expected_start} was expected",
                p.start()
            )));
        }
        expected_start = p.end();
    }
    if expected_start != node_count {
        return Err(PregelError::InvalidPartitions(format!(
            "partitions cover 0..{expected_start} but the graph has {node_count} nodes"
        )));
    }
    Ok(())
}
