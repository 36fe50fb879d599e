// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only graph boundary consumed by the engine, plus a compact in-memory
//! implementation.
//!
//! The engine never mutates topology. It asks a [`GraphView`] for the node
//! count and a partitioning of the node-id space, and gives every partition
//! task its own [`GraphView::concurrent_copy`] for relationship traversal.
//! Implementations whose traversal keeps per-cursor state (decompression
//! buffers, page caches) put that state in the copy, not in the shared view.

use crate::error::GraphError;
use crate::partition::{degree_partitions, range_partitions, Partition, Partitioning};

/// Dense node identifier in `[0, node_count)`.
pub type NodeId = usize;

/// Relationship direction relative to the node being traversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Direction {
    /// Relationships leaving the node.
    #[default]
    Outgoing,
    /// Relationships entering the node.
    Incoming,
    /// Outgoing followed by incoming relationships.
    Both,
}

/// Per-thread relationship access.
///
/// Handed to exactly one partition task at a time; never shared between
/// threads.
pub trait RelationshipCursor {
    /// Number of relationships of `node` in `direction`.
    fn degree(&self, node: NodeId, direction: Direction) -> usize;

    /// Calls `consumer(target, weight)` for each relationship of `node` in
    /// `direction`. Unweighted graphs report a weight of `1.0`.
    fn for_each_relationship(
        &mut self,
        node: NodeId,
        direction: Direction,
        consumer: &mut dyn FnMut(NodeId, f64),
    );
}

/// Read-only topology consumed by the engine.
pub trait GraphView: Sync {
    /// Thread-confined copy used by a single partition task.
    type Local<'g>: RelationshipCursor
    where
        Self: 'g;

    /// Number of nodes; node ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Cheap copy that is safe to use from one worker thread.
    fn concurrent_copy(&self) -> Self::Local<'_>;

    /// Splits the node-id space into disjoint, ascending, contiguous batches.
    ///
    /// The default implementation uses fixed-size ranges or degree-balanced
    /// ranges depending on `partitioning`. Overrides must keep the
    /// contiguous/ascending/covering shape; the orchestrator rejects anything
    /// else.
    fn partitions(
        &self,
        batch_size: usize,
        partitioning: Partitioning,
        direction: Direction,
    ) -> Vec<Partition> {
        match partitioning {
            Partitioning::Range => range_partitions(self.node_count(), batch_size),
            Partitioning::Degree => degree_partitions(
                self.node_count(),
                &self.concurrent_copy(),
                direction,
                batch_size,
            ),
        }
    }
}

/// Compressed sparse row adjacency for one direction.
#[derive(Clone, Debug, Default)]
struct Csr {
    offsets: Vec<usize>,
    targets: Vec<NodeId>,
    weights: Vec<f64>,
}

impl Csr {
    /// Counting-sort construction; per-node insertion order is preserved.
    fn build<I>(node_count: usize, arcs: I) -> Self
    where
        I: Iterator<Item = (NodeId, NodeId, f64)> + Clone,
    {
        let mut offsets = vec![0usize; node_count + 1];
        for (from, _, _) in arcs.clone() {
            offsets[from + 1] += 1;
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }
        let total = offsets[node_count];
        let mut next = offsets.clone();
        let mut targets = vec![0; total];
        let mut weights = vec![0.0; total];
        for (from, to, weight) in arcs {
            let slot = next[from];
            targets[slot] = to;
            weights[slot] = weight;
            next[from] += 1;
        }
        Self {
            offsets,
            targets,
            weights,
        }
    }

    #[inline]
    fn degree(&self, node: NodeId) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    #[inline]
    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let range = self.offsets[node]..self.offsets[node + 1];
        self.targets[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter().copied())
    }
}

/// Immutable in-memory graph with CSR adjacency in both directions.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyGraph {
    node_count: usize,
    outgoing: Csr,
    incoming: Csr,
    undirected: bool,
}

impl AdjacencyGraph {
    /// Builds a directed, unweighted graph from `(from, to)` pairs.
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId)]) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::new(node_count);
        for &(from, to) in edges {
            builder.add_edge(from, to);
        }
        builder.build()
    }

    /// Number of stored relationships (each undirected edge counts twice).
    pub fn relationship_count(&self) -> usize {
        self.outgoing.targets.len()
    }

    /// Returns `true` if the graph was built as undirected.
    pub fn is_undirected(&self) -> bool {
        self.undirected
    }

    /// Degree of `node` in `direction`.
    ///
    /// # Panics
    ///
    /// Panics if `node >= node_count`.
    pub fn degree(&self, node: NodeId, direction: Direction) -> usize {
        match direction {
            Direction::Outgoing => self.outgoing.degree(node),
            Direction::Incoming => self.incoming.degree(node),
            Direction::Both => self.outgoing.degree(node) + self.incoming.degree(node),
        }
    }

    /// Returns a pointer-sized, `Copy` view for traversal.
    pub fn view(&self) -> AdjacencyView<'_> {
        AdjacencyView { graph: self }
    }
}

impl GraphView for AdjacencyGraph {
    type Local<'g> = AdjacencyView<'g>;

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn concurrent_copy(&self) -> Self::Local<'_> {
        self.view()
    }
}

/// Read-only traversal handle over an [`AdjacencyGraph`].
///
/// Exactly one pointer wide, so handing one to every partition task costs
/// nothing.
#[derive(Clone, Copy, Debug)]
pub struct AdjacencyView<'a> {
    graph: &'a AdjacencyGraph,
}

impl RelationshipCursor for AdjacencyView<'_> {
    fn degree(&self, node: NodeId, direction: Direction) -> usize {
        self.graph.degree(node, direction)
    }

    fn for_each_relationship(
        &mut self,
        node: NodeId,
        direction: Direction,
        consumer: &mut dyn FnMut(NodeId, f64),
    ) {
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            for (target, weight) in self.graph.outgoing.neighbors(node) {
                consumer(target, weight);
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            for (target, weight) in self.graph.incoming.neighbors(node) {
                consumer(target, weight);
            }
        }
    }
}

/// Incremental constructor for [`AdjacencyGraph`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    node_count: usize,
    edges: Vec<(NodeId, NodeId, f64)>,
    undirected: bool,
}

impl GraphBuilder {
    /// Starts a builder for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            ..Self::default()
        }
    }

    /// Stores every edge in both directions.
    pub fn undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    /// Grows the node universe so that it holds at least `node_count` nodes.
    pub fn ensure_nodes(&mut self, node_count: usize) -> &mut Self {
        self.node_count = self.node_count.max(node_count);
        self
    }

    /// Adds an unweighted edge (weight `1.0`).
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        self.add_weighted_edge(from, to, 1.0)
    }

    /// Adds a weighted edge.
    pub fn add_weighted_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> &mut Self {
        self.edges.push((from, to, weight));
        self
    }

    /// Validates endpoints and lays out both CSR directions.
    pub fn build(self) -> Result<AdjacencyGraph, GraphError> {
        let n = self.node_count;
        if let Some(&(from, to, _)) = self.edges.iter().find(|(f, t, _)| *f >= n || *t >= n) {
            return Err(GraphError::EndpointOutOfRange {
                from,
                to,
                node_count: n,
            });
        }

        let forward = self.edges.iter().copied();
        let reverse = self.edges.iter().map(|&(f, t, w)| (t, f, w));

        let (outgoing, incoming) = if self.undirected {
            let both = forward.chain(reverse);
            (Csr::build(n, both.clone()), Csr::build(n, both))
        } else {
            (Csr::build(n, forward), Csr::build(n, reverse))
        };

        Ok(AdjacencyGraph {
            node_count: n,
            outgoing,
            incoming,
            undirected: self.undirected,
        })
    }
}
