// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use std::sync::Mutex;

use pregel_core::{AdjacencyGraph, GraphBuilder, NodeId};

/// Worker counts every invariance test sweeps.
pub const WORKER_COUNTS: &[usize] = &[1, 2, 4, 8, 16, 32];

/// Seeds for randomly generated graphs.
pub const SEEDS: &[u64] = &[
    0x0000_0000_0000_002A,
    0xDEAD_BEEF_CAFE_BABE,
    0x1234_5678_9ABC_DEF0,
    0x0F0F_0F0F_F0F0_F0F0,
    0x8000_0000_0000_0001,
];

/// Tiny deterministic RNG (xorshift64*) so tests don't need `rand`.
#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new PRNG with the given seed (0 is replaced with 1).
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Returns the next pseudo-random `u64`.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Returns a pseudo-random value in `[0, upper)`.
    pub fn gen_range_usize(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }
}

/// Node names of [`rank_graph`], indexed by node id.
pub const RANK_GRAPH_NAMES: [char; 11] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k'];

/// Normalized ranks of [`rank_graph`] after 10 supersteps with damping 0.85
/// (the published worked example).
pub const RANK_GRAPH_EXPECTED: [f64; 11] = [
    0.0276, 0.3483, 0.2650, 0.0330, 0.0682, 0.0330, 0.0136, 0.0136, 0.0136, 0.0136, 0.0136,
];

/// Stationary ranks of [`rank_graph`] with damping 0.85.
pub const RANK_GRAPH_FIXED_POINT: [f64; 11] = [
    0.027646, 0.324181, 0.289190, 0.032964, 0.068214, 0.032964, 0.013636, 0.013636, 0.013636,
    0.013636, 0.013636,
];

/// The classic 11-node rank-propagation fixture; `b` collects the most
/// in-links.
pub fn rank_graph() -> AdjacencyGraph {
    let edges = [
        ('b', 'c'),
        ('c', 'b'),
        ('d', 'a'),
        ('d', 'b'),
        ('e', 'b'),
        ('e', 'd'),
        ('e', 'f'),
        ('f', 'b'),
        ('f', 'e'),
        ('g', 'b'),
        ('g', 'e'),
        ('h', 'b'),
        ('h', 'e'),
        ('i', 'b'),
        ('i', 'e'),
        ('j', 'e'),
        ('k', 'e'),
    ];
    let id = |c: char| RANK_GRAPH_NAMES.iter().position(|&n| n == c).unwrap();
    let pairs: Vec<_> = edges.iter().map(|&(f, t)| (id(f), id(t))).collect();
    AdjacencyGraph::from_edges(RANK_GRAPH_NAMES.len(), &pairs).unwrap()
}

/// Random directed edge list over `node_count` nodes with weights in
/// `1.0..=8.0` (whole numbers, so path sums stay exact).
pub fn random_edges(
    rng: &mut XorShift64,
    node_count: usize,
    edge_count: usize,
) -> Vec<(NodeId, NodeId, f64)> {
    (0..edge_count)
        .map(|_| {
            let from = rng.gen_range_usize(node_count);
            let to = rng.gen_range_usize(node_count);
            let weight = (rng.gen_range_usize(8) + 1) as f64;
            (from, to, weight)
        })
        .collect()
}

/// Builds a directed weighted graph from [`random_edges`] output.
pub fn build_graph(node_count: usize, edges: &[(NodeId, NodeId, f64)]) -> AdjacencyGraph {
    let mut builder = GraphBuilder::new(node_count);
    for &(from, to, weight) in edges {
        builder.add_weighted_edge(from, to, weight);
    }
    builder.build().unwrap()
}

/// Random graph from a seed.
pub fn random_graph(seed: u64, node_count: usize, edge_count: usize) -> AdjacencyGraph {
    let mut rng = XorShift64::new(seed);
    build_graph(node_count, &random_edges(&mut rng, node_count, edge_count))
}

/// Thread-safe log of `(superstep, node, messages)` compute invocations.
#[derive(Default)]
pub struct Probe {
    calls: Mutex<Vec<(usize, NodeId, Vec<f64>)>>,
}

impl Probe {
    /// Records one invocation.
    pub fn record(&self, superstep: usize, node: NodeId, messages: Vec<f64>) {
        self.calls.lock().unwrap().push((superstep, node, messages));
    }

    /// Supersteps in which `node` computed, ascending.
    pub fn supersteps_of(&self, node: NodeId) -> Vec<usize> {
        let mut steps: Vec<_> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, n, _)| *n == node)
            .map(|(s, _, _)| *s)
            .collect();
        steps.sort_unstable();
        steps
    }

    /// Nodes computed in `superstep`, ascending.
    pub fn nodes_in(&self, superstep: usize) -> Vec<NodeId> {
        let mut nodes: Vec<_> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _, _)| *s == superstep)
            .map(|(_, n, _)| *n)
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Messages `node` saw in `superstep`, sorted; `None` if it did not
    /// compute.
    pub fn messages(&self, superstep: usize, node: NodeId) -> Option<Vec<f64>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(s, n, _)| *s == superstep && *n == node)
            .map(|(_, _, m)| {
                let mut m = m.clone();
                m.sort_by(f64::total_cmp);
                m
            })
    }

    /// Total compute invocations.
    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}
