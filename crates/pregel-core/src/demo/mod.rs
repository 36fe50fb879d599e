// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ready-made computations.
//!
//! These exercise the three message strategies end to end and back the
//! `pregel` CLI. Each is small enough to double as an example of the
//! [`Computation`](crate::Computation) contract.

mod components;
mod page_rank;
mod sssp;

pub use components::ConnectedComponents;
pub use page_rank::{PageRank, DEFAULT_DAMPING_FACTOR};
pub use sssp::ShortestPaths;
