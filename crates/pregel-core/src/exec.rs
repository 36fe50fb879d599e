// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded worker pool for one superstep.
//!
//! Steps go into a lock-free injector queue; `workers` scoped threads claim
//! steps until the queue is empty (work-stealing), each accumulating into its
//! own [`StepOutcome`]. Returning from [`execute_steps`] is the superstep's
//! join barrier.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;

use crate::computation::Computation;
use crate::graph::GraphView;
use crate::step::{ComputeStep, StepFault, StepOutcome};

/// Serial baseline: runs every step on the calling thread.
pub(crate) fn execute_serial<G, C>(
    steps: Vec<ComputeStep<'_, G, C>>,
    node_count: usize,
) -> Result<StepOutcome, StepFault>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    let mut outcome = StepOutcome::new(node_count);
    let mut inbox = Vec::new();
    for step in steps {
        step.run(&mut outcome, &mut inbox)?;
        if outcome.interrupted {
            break;
        }
    }
    Ok(outcome)
}

/// Runs `steps` on up to `workers` threads and returns one outcome per
/// worker.
///
/// The first failing or panicking step raises a shared abort flag so the
/// other workers stop claiming steps. A fault is returned; a panic inside a
/// compute call is re-raised on the calling thread once every worker has
/// been joined.
///
/// # Panics
///
/// Re-raises any panic from a worker thread.
pub(crate) fn execute_steps<G, C>(
    steps: Vec<ComputeStep<'_, G, C>>,
    workers: usize,
    node_count: usize,
) -> Result<Vec<StepOutcome>, StepFault>
where
    G: GraphView,
    C: Computation + ?Sized,
{
    if steps.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, steps.len());
    if workers == 1 {
        return execute_serial(steps, node_count).map(|outcome| vec![outcome]);
    }

    let queue = SegQueue::new();
    for step in steps {
        queue.push(step);
    }
    let abort = AtomicBool::new(false);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let queue = &queue;
                let abort = &abort;

                s.spawn(move || -> Result<StepOutcome, StepFault> {
                    let mut outcome = StepOutcome::new(node_count);
                    let mut inbox = Vec::new();

                    // Claim steps until none remain or a peer failed.
                    while !abort.load(Ordering::Relaxed) {
                        let Some(step) = queue.pop() else {
                            break;
                        };
                        let ran = panic::catch_unwind(AssertUnwindSafe(|| {
                            step.run(&mut outcome, &mut inbox)
                        }));
                        match ran {
                            Ok(Ok(())) => {}
                            Ok(Err(fault)) => {
                                abort.store(true, Ordering::Relaxed);
                                return Err(fault);
                            }
                            Err(payload) => {
                                abort.store(true, Ordering::Relaxed);
                                panic::resume_unwind(payload);
                            }
                        }
                        if outcome.interrupted {
                            break;
                        }
                    }

                    Ok(outcome)
                })
            })
            .collect();

        let joined: Vec<_> = handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(e) => panic::resume_unwind(e),
            })
            .collect();

        joined.into_iter().collect()
    })
}
