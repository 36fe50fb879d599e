// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for runs, computations and graph construction.

use thiserror::Error;

use crate::graph::NodeId;

/// Failure raised by a user computation from inside `compute`.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// A message was addressed to a node outside the graph.
    #[error("message target {target} is outside the node range 0..{node_count}")]
    UnknownTarget {
        /// The offending target id.
        target: NodeId,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// Algorithm-specific failure with a human-readable reason.
    #[error("{0}")]
    Failed(String),
    /// Any other error propagated from algorithm code.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ComputeError {
    /// Builds a [`ComputeError::Failed`] from a message.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Errors raised while building an in-memory graph.
///
/// Returned by [`crate::GraphBuilder::build`]; a run never sees an invalid
/// graph, so this is not part of [`PregelError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint does not exist.
    #[error("edge {from} -> {to} references a node outside 0..{node_count}")]
    EndpointOutOfRange {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
        /// Number of nodes declared for the graph.
        node_count: usize,
    },
}

/// Errors returned by [`crate::Pregel::run`].
///
/// Configuration variants are raised before any partitioning or thread
/// creation. [`PregelError::Compute`] aborts the whole run; the partially
/// written node values are discarded.
#[derive(Debug, Error)]
pub enum PregelError {
    /// `max_supersteps` was zero.
    #[error("max_supersteps must be greater than zero")]
    ZeroMaxSupersteps,
    /// `concurrency` was zero.
    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,
    /// An explicit `batch_size` of zero was configured.
    #[error("batch_size must be greater than zero")]
    ZeroBatchSize,
    /// Caller-supplied initial values do not match the node count.
    #[error("initial values cover {actual} nodes but the graph has {expected}")]
    InitialValuesLength {
        /// Node count of the graph.
        expected: usize,
        /// Length of the supplied values.
        actual: usize,
    },
    /// The graph view produced partitions that are not contiguous, ordered
    /// and covering.
    #[error("invalid graph partitioning: {0}")]
    InvalidPartitions(String),
    /// A computation failed; the run was aborted.
    #[error("compute failed for node {node} in superstep {superstep}: {source}")]
    Compute {
        /// Node whose compute call failed.
        node: NodeId,
        /// Superstep in which it failed.
        superstep: usize,
        /// The computation's error.
        #[source]
        source: ComputeError,
    },
}

impl PregelError {
    /// Returns `true` for errors raised by configuration validation, i.e.
    /// before any work was scheduled.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ZeroMaxSupersteps
                | Self::ZeroConcurrency
                | Self::ZeroBatchSize
                | Self::InitialValuesLength { .. }
                | Self::InvalidPartitions(_)
        )
    }
}
