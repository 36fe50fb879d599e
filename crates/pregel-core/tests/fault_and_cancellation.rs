// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compute faults, panics and cooperative cancellation.
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::WORKER_COUNTS;
use pregel_core::{
    run, AdjacencyGraph, ComputeContext, ComputeError, Computation, Messages, NodeId, Pregel,
    PregelConfig, PregelError, TerminationFlag,
};

/// Keeps every node busy by mailing itself; fails or panics on request.
struct Faulty {
    node: NodeId,
    superstep: usize,
    panic: bool,
}

impl Computation for Faulty {
    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        _messages: Messages<'_>,
    ) -> Result<(), ComputeError> {
        if ctx.node_id() == self.node && ctx.superstep() == self.superstep {
            if self.panic {
                panic!("boom");
            }
            return Err(ComputeError::failed("boom"));
        }
        ctx.send_to(ctx.node_id(), 0.0)
    }
}

#[test]
fn compute_fault_reports_node_and_superstep() {
    let graph = AdjacencyGraph::from_edges(64, &[]).unwrap();
    let faulty = Faulty {
        node: 37,
        superstep: 2,
        panic: false,
    };
    for &workers in WORKER_COUNTS {
        let config = PregelConfig::default()
            .with_concurrency(workers)
            .with_batch_size(4);
        let err = run(&graph, &faulty, None, config).unwrap_err();
        match err {
            PregelError::Compute {
                node,
                superstep,
                source,
            } => {
                assert_eq!((node, superstep), (37, 2));
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn sending_outside_the_graph_is_a_fault() {
    struct Stray;
    impl Computation for Stray {
        fn compute(
            &self,
            ctx: &mut ComputeContext<'_>,
            _messages: Messages<'_>,
        ) -> Result<(), ComputeError> {
            ctx.send_to(ctx.node_count(), 1.0)
        }
    }
    let graph = AdjacencyGraph::from_edges(3, &[]).unwrap();
    let err = run(&graph, &Stray, None, PregelConfig::default().with_concurrency(1)).unwrap_err();
    assert!(matches!(
        err,
        PregelError::Compute {
            node: 0,
            superstep: 0,
            source: ComputeError::UnknownTarget {
                target: 3,
                node_count: 3
            }
        }
    ));
}

#[test]
#[should_panic(expected = "boom")]
fn compute_panic_is_reraised_on_the_caller() {
    let graph = AdjacencyGraph::from_edges(64, &[]).unwrap();
    let faulty = Faulty {
        node: 10,
        superstep: 1,
        panic: true,
    };
    let config = PregelConfig::default()
        .with_concurrency(4)
        .with_batch_size(8);
    let _ = run(&graph, &faulty, None, config);
}

#[test]
fn compute_panic_stops_peers_from_claiming_steps() {
    /// Panics on node 0; every other node is slow and counted.
    struct SlowPeers {
        computed: AtomicUsize,
    }
    impl Computation for SlowPeers {
        fn compute(
            &self,
            ctx: &mut ComputeContext<'_>,
            _messages: Messages<'_>,
        ) -> Result<(), ComputeError> {
            if ctx.node_id() == 0 {
                panic!("boom");
            }
            std::thread::sleep(Duration::from_millis(5));
            self.computed.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    let graph = AdjacencyGraph::from_edges(64, &[]).unwrap();
    let slow = SlowPeers {
        computed: AtomicUsize::new(0),
    };
    let config = PregelConfig::default()
        .with_concurrency(2)
        .with_batch_size(1);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(&graph, &slow, None, config)));
    assert!(outcome.is_err(), "panic must reach the caller");
    // The healthy worker finishes the step it holds, then sees the abort.
    let computed = slow.computed.load(Ordering::Relaxed);
    assert!(computed < 8, "{computed} of 63 peer steps ran after the panic");
}

/// Stops the shared flag from inside compute.
struct Stopper {
    flag: TerminationFlag,
    at_superstep: usize,
}

impl Computation for Stopper {
    fn compute(
        &self,
        ctx: &mut ComputeContext<'_>,
        _messages: Messages<'_>,
    ) -> Result<(), ComputeError> {
        ctx.set_value(ctx.superstep() as f64 + 1.0);
        if ctx.node_id() == 0 && ctx.superstep() == self.at_superstep {
            self.flag.stop();
        }
        ctx.send_to(ctx.node_id(), 0.0)
    }
}

#[test]
fn cancellation_is_reported_not_raised() {
    let graph = AdjacencyGraph::from_edges(16, &[]).unwrap();
    for &workers in WORKER_COUNTS {
        let flag = TerminationFlag::new();
        let stopper = Stopper {
            flag: flag.clone(),
            at_superstep: 2,
        };
        let config = PregelConfig::default()
            .with_concurrency(workers)
            .with_batch_size(4);
        let result = Pregel::new(&graph, &stopper, config)
            .with_termination(flag)
            .run()
            .unwrap();
        assert!(result.cancelled);
        assert!(!result.did_converge);
        assert_eq!(result.ran_supersteps, 2);
        assert_eq!(result.stats.len(), 2);
        // Superstep 2 is rolled back; every node holds its superstep-1 value.
        assert_eq!(result.values.as_slice(), &[2.0; 16], "{workers} workers");
    }
}

#[test]
fn cancelled_values_match_the_last_barrier() {
    let graph = AdjacencyGraph::from_edges(4, &[]).unwrap();
    for at_superstep in 0..4 {
        let flag = TerminationFlag::new();
        let stopper = Stopper {
            flag: flag.clone(),
            at_superstep,
        };
        let config = PregelConfig::default().with_concurrency(1);
        let result = Pregel::new(&graph, &stopper, config)
            .with_termination(flag)
            .run()
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.ran_supersteps, at_superstep);
        // After superstep `s` every node holds `s + 1`; before any, the default.
        let expected = result.ran_supersteps as f64;
        assert!(
            result.values.iter().all(|(_, v)| v == expected),
            "stop at {at_superstep}: {:?}",
            result.values.as_slice()
        );
    }
}

#[test]
fn stopped_flag_runs_nothing() {
    let graph = AdjacencyGraph::from_edges(8, &[]).unwrap();
    let flag = TerminationFlag::new();
    flag.stop();
    let stopper = Stopper {
        flag: flag.clone(),
        at_superstep: usize::MAX,
    };
    let result = Pregel::new(&graph, &stopper, PregelConfig::default())
        .with_termination(flag)
        .run()
        .unwrap();
    assert!(result.cancelled);
    assert_eq!(result.ran_supersteps, 0);
    assert_eq!(result.values.as_slice(), &[0.0; 8]);
}

#[test]
fn expired_deadline_cancels() {
    let graph = AdjacencyGraph::from_edges(8, &[]).unwrap();
    let stopper = Stopper {
        flag: TerminationFlag::new(),
        at_superstep: usize::MAX,
    };
    let result = Pregel::new(&graph, &stopper, PregelConfig::default())
        .with_termination(TerminationFlag::with_timeout(Duration::ZERO))
        .run()
        .unwrap();
    assert!(result.cancelled);
    assert!(!result.did_converge);
    assert_eq!(result.ran_supersteps, 0);
}
