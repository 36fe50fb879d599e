// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph fixtures shared by the pregel-core benchmarks.

use pregel_core::{AdjacencyGraph, GraphBuilder, GraphError};

/// Deterministic xorshift64* generator so fixtures are stable across runs.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seeded generator (0 is replaced with 1).
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Next pseudo-random value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Pseudo-random value in `[0, upper)`; `upper` must be non-zero.
    pub fn below(&mut self, upper: usize) -> usize {
        // Modulo bias is irrelevant for fixtures.
        usize::try_from(self.next_u64() % upper as u64).unwrap_or(0)
    }
}

/// Uniform random directed graph with `node_count * avg_degree` edges and
/// weights in `1..=8`.
pub fn uniform_graph(
    node_count: usize,
    avg_degree: usize,
    seed: u64,
) -> Result<AdjacencyGraph, GraphError> {
    let mut rng = XorShift64::new(seed);
    let mut builder = GraphBuilder::new(node_count);
    for _ in 0..node_count * avg_degree {
        let from = rng.below(node_count);
        let to = rng.below(node_count);
        let weight = (rng.below(8) + 1) as f64;
        builder.add_weighted_edge(from, to, weight);
    }
    builder.build()
}

/// Skewed graph: every edge targets one of the first `hubs` nodes and every
/// hub links back to a random node, so a few ids carry most of the degree.
pub fn hub_graph(node_count: usize, hubs: usize, seed: u64) -> Result<AdjacencyGraph, GraphError> {
    let mut rng = XorShift64::new(seed);
    let hubs = hubs.clamp(1, node_count.max(1));
    let mut builder = GraphBuilder::new(node_count).undirected(true);
    for node in 0..node_count {
        builder.add_edge(node, rng.below(hubs));
    }
    builder.build()
}
