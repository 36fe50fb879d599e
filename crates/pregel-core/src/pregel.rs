// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orchestrator: the superstep loop.
//!
//! Per superstep:
//!
//! 1. mark the round boundary in the mailboxes of last round's recipients,
//! 2. split the value store into one exclusive view per partition and build
//!    one [`ComputeStep`] per partition,
//! 3. run the steps on the worker pool and wait for all of them,
//! 4. OR-reduce the workers' private bit-vectors into the next activity
//!    state,
//! 5. stop if nobody was sent mail, or if the master hook asks to.
//!
//! A superstep interrupted by cancellation is rolled back to the value
//! snapshot taken at its start, so a cancelled run returns the values of its
//! last barrier.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn};

use crate::computation::{Computation, MasterContext};
use crate::config::PregelConfig;
use crate::error::PregelError;
use crate::exec::execute_steps;
use crate::graph::GraphView;
use crate::messenger::Messenger;
use crate::partition::{batch_size_for, validate_partitions};
use crate::step::{ActivityState, ComputeStep};
use crate::termination::TerminationFlag;
use crate::values::NodeValues;

/// Bookkeeping for one completed superstep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuperstepStats {
    /// Superstep index.
    pub superstep: usize,
    /// Partition tasks executed.
    pub partitions: usize,
    /// Compute invocations.
    pub computed_nodes: usize,
    /// Nodes that were sent at least one message.
    pub messaged_nodes: usize,
    /// Nodes dormant after the barrier.
    pub halted_nodes: usize,
    /// Wall time from boundary marking to merged activity state.
    pub elapsed: Duration,
}

/// Outcome of a run.
#[derive(Clone, Debug)]
pub struct PregelResult {
    /// Final node values.
    pub values: NodeValues,
    /// Supersteps that ran to completion.
    pub ran_supersteps: usize,
    /// `true` if the run stopped on its own (silence or master stop) before
    /// exhausting `max_supersteps`.
    pub did_converge: bool,
    /// `true` if the termination flag stopped the run. Values then are
    /// exactly those at the end of superstep `ran_supersteps - 1` (or the
    /// initial values when no superstep completed); writes of the
    /// interrupted superstep are rolled back.
    pub cancelled: bool,
    /// One entry per completed superstep.
    pub stats: Vec<SuperstepStats>,
}

/// A configured run of `computation` over `graph`.
pub struct Pregel<'a, G, C>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    graph: &'a G,
    computation: &'a C,
    config: PregelConfig,
    initial_values: Option<NodeValues>,
    termination: TerminationFlag,
}

impl<'a, G, C> Pregel<'a, G, C>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    /// Prepares a run; nothing is allocated until [`run`](Self::run).
    pub fn new(graph: &'a G, computation: &'a C, config: PregelConfig) -> Self {
        Self {
            graph,
            computation,
            config,
            initial_values: None,
            termination: TerminationFlag::default(),
        }
    }

    /// Starts from caller-supplied values instead of the computation's
    /// default value. Must hold exactly one value per node.
    pub fn with_initial_values(mut self, values: NodeValues) -> Self {
        self.initial_values = Some(values);
        self
    }

    /// Installs a cancellation flag.
    pub fn with_termination(mut self, termination: TerminationFlag) -> Self {
        self.termination = termination;
        self
    }

    /// Executes supersteps until silence, the superstep budget, a master
    /// stop, or cancellation.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before any work is scheduled.
    /// [`PregelError::Compute`] aborts the run and discards all values.
    ///
    /// # Panics
    ///
    /// Re-raises panics from compute calls.
    #[instrument(
        name = "pregel_run",
        skip_all,
        fields(
            node_count = self.graph.node_count(),
            max_supersteps = self.config.max_supersteps,
            concurrency = self.config.concurrency
        )
    )]
    pub fn run(self) -> Result<PregelResult, PregelError> {
        self.config.validate()?;

        let node_count = self.graph.node_count();
        let mut values = match self.initial_values {
            Some(values) if values.len() != node_count => {
                return Err(PregelError::InitialValuesLength {
                    expected: node_count,
                    actual: values.len(),
                });
            }
            Some(values) => values,
            None => NodeValues::filled(node_count, self.computation.default_node_value()),
        };

        let batch_size = batch_size_for(node_count, self.config.concurrency, self.config.batch_size);
        let partitions = self.graph.partitions(
            batch_size,
            self.config.partitioning,
            self.computation.direction(),
        );
        validate_partitions(&partitions, node_count)?;

        let workers = self.config.concurrency.min(partitions.len()).max(1);
        let synchronous = self.computation.is_synchronous();
        let mut messenger = Messenger::new(node_count, synchronous, self.computation.reducer());
        let mut activity = ActivityState::initial(node_count);

        info!(
            partitions = partitions.len(),
            batch_size,
            workers,
            synchronous,
            "starting run"
        );

        let started = Instant::now();
        let mut stats = Vec::new();
        let mut barrier_values = Vec::with_capacity(node_count);
        let mut ran_supersteps = 0;
        let mut did_converge = false;
        let mut cancelled = false;

        while ran_supersteps < self.config.max_supersteps {
            let superstep = ran_supersteps;
            if !self.termination.running() {
                cancelled = true;
                break;
            }
            let step_started = Instant::now();

            messenger.init_superstep(superstep, &activity.received);
            values.snapshot_into(&mut barrier_values);

            let steps: Vec<_> = values
                .split_partitions(&partitions)
                .into_iter()
                .zip(&partitions)
                .map(|(view, &partition)| ComputeStep {
                    superstep,
                    partition,
                    values: view,
                    graph: self.graph,
                    computation: self.computation,
                    messenger: &messenger,
                    activity: &activity,
                    termination: &self.termination,
                })
                .collect();

            let outcomes = execute_steps(steps, workers, node_count).map_err(|fault| {
                error!(
                    node = fault.node,
                    superstep,
                    error = %fault.source,
                    "compute failed; aborting run"
                );
                PregelError::from(fault)
            })?;

            if outcomes.iter().any(|o| o.interrupted) {
                values.restore_from(&barrier_values);
                cancelled = true;
                break;
            }

            let computed_nodes = outcomes.iter().map(|o| o.computed).sum();
            activity = ActivityState::merge(node_count, outcomes);
            ran_supersteps += 1;

            let stat = SuperstepStats {
                superstep,
                partitions: partitions.len(),
                computed_nodes,
                messaged_nodes: activity.received.count_ones(),
                halted_nodes: activity.halted.count_ones(),
                elapsed: step_started.elapsed(),
            };
            debug!(
                superstep,
                computed = stat.computed_nodes,
                messaged = stat.messaged_nodes,
                halted = stat.halted_nodes,
                elapsed_us = u64::try_from(stat.elapsed.as_micros()).unwrap_or(u64::MAX),
                "superstep complete"
            );
            stats.push(stat);

            if activity.received.is_clear() {
                did_converge = true;
                break;
            }

            let master = MasterContext::new(
                superstep,
                &values,
                stat.messaged_nodes,
                stat.halted_nodes,
            );
            if self.computation.master_compute(&master) {
                debug!(superstep, "master compute requested stop");
                did_converge = true;
                break;
            }
        }

        if cancelled {
            warn!(ran_supersteps, "run cancelled");
        }
        info!(
            ran_supersteps,
            did_converge,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "run finished"
        );

        Ok(PregelResult {
            values,
            ran_supersteps,
            did_converge,
            cancelled,
            stats,
        })
    }
}

/// Runs `computation` over `graph` with `config`.
///
/// Shorthand for [`Pregel::new`] followed by the optional
/// [`Pregel::with_initial_values`] and [`Pregel::run`].
pub fn run<G, C>(
    graph: &G,
    computation: &C,
    initial_values: Option<NodeValues>,
    config: PregelConfig,
) -> Result<PregelResult, PregelError>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    let pregel = Pregel::new(graph, computation, config);
    match initial_values {
        Some(values) => pregel.with_initial_values(values).run(),
        None => pregel.run(),
    }
}
