// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! pregel-core: vertex-centric bulk-synchronous-parallel graph computation.
//!
//! An algorithm is written as a per-node [`Computation`]. The engine runs it in
//! synchronized rounds ("supersteps") over disjoint node partitions on a
//! bounded pool of worker threads. Nodes communicate only through messages,
//! and a message sent in superstep `i` is visible to its target in superstep
//! `i + 1`. A run stops once a superstep ends without any message being sent,
//! when the superstep budget is exhausted, or when the computation's master
//! hook asks for it.
//!
//! ```text
//!   ┌──────────── superstep i ────────────┐   ┌──── superstep i+1 ────┐
//!   │ mark round boundary in mailboxes     │   │                        │
//!   │ split values into partition views    │   │          ...           │
//!   │ workers claim ComputeSteps ──► join  │──►│                        │
//!   │ OR-reduce per-worker bit-vectors     │   │                        │
//!   └──────────────────────────────────────┘   └────────────────────────┘
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::cast_precision_loss,
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names,
    clippy::many_single_char_names,
    clippy::option_if_let_else
)]

mod bitset;
mod computation;
mod config;
/// Ready-made computations (rank propagation, components, shortest paths).
pub mod demo;
mod error;
mod exec;
mod graph;
mod messenger;
mod partition;
mod pregel;
mod step;
mod termination;
mod values;

/// Fixed-length bit-vector used for activity tracking.
pub use bitset::BitSet;
/// The algorithm-author contract and the contexts handed to it.
pub use computation::{ComputeContext, Computation, InitContext, MasterContext, Messages};
/// Engine configuration consumed by [`Pregel`].
pub use config::{PregelConfig, DEFAULT_MAX_SUPERSTEPS};
/// Error types surfaced by runs and computations.
pub use error::{ComputeError, GraphError, PregelError};
/// Graph view boundary and the bundled in-memory adjacency graph.
pub use graph::{
    AdjacencyGraph, AdjacencyView, Direction, GraphBuilder, GraphView, NodeId, RelationshipCursor,
};
/// Message combiners for reducing mailboxes.
pub use messenger::Reducer;
/// Node-space partitioning.
pub use partition::{
    batch_size_for, degree_partitions, range_partitions, validate_partitions, Partition,
    Partitioning, MIN_BATCH_SIZE,
};
/// Orchestrator entry points and run results.
pub use pregel::{run, Pregel, PregelResult, SuperstepStats};
/// Cooperative cancellation.
pub use termination::TerminationFlag;
/// Node value store.
pub use values::NodeValues;
