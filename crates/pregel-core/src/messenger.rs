// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mailbox set: one inbox per node.
//!
//! Any worker may send to any node (many producers); only the task owning a
//! node drains its inbox (single consumer). The single-consumer property is
//! not enforced by the queue type. It holds because partitions are disjoint
//! and supersteps are separated by a join barrier.
//!
//! # Round isolation
//!
//! Queue mailboxes never get cleared. Before superstep `i` starts, every
//! inbox that received mail during `i - 1` gets an [`Envelope::EndOfRound`]
//! marker appended. Draining stops at the first marker, so mail sent during
//! `i` (which lands after the marker) stays queued for `i + 1`.
//!
//! # Reducing mailboxes
//!
//! With a [`Reducer`], messages are folded at send time into one atomic slot
//! per node. Two slot arrays alternate between "being written this round" and
//! "being read this round".

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::queue::SegQueue;

use crate::bitset::BitSet;
use crate::graph::NodeId;

/// Commutative, associative message combiner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Reducer {
    /// Sum of all messages.
    Sum,
    /// Smallest message.
    Min,
    /// Largest message.
    Max,
    /// Number of messages (payloads are ignored).
    Count,
}

impl Reducer {
    /// Neutral starting value of the fold.
    pub fn identity(self) -> f64 {
        match self {
            Self::Sum | Self::Count => 0.0,
            Self::Min => f64::INFINITY,
            Self::Max => f64::NEG_INFINITY,
        }
    }

    /// Folds `message` into `current`.
    pub fn reduce(self, current: f64, message: f64) -> f64 {
        match self {
            Self::Sum => current + message,
            Self::Min => current.min(message),
            Self::Max => current.max(message),
            Self::Count => current + 1.0,
        }
    }
}

/// Queue entry: a payload or the boundary between two rounds' batches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Envelope {
    Payload(f64),
    EndOfRound,
}

/// Message delivery strategy for one run.
#[derive(Debug)]
pub(crate) enum Messenger {
    /// Unbounded per-node queues.
    Queue {
        mailboxes: Vec<SegQueue<Envelope>>,
        synchronous: bool,
    },
    /// One folded value per node and round.
    Reducing {
        reducer: Reducer,
        /// Read during the current superstep.
        current: Vec<AtomicU64>,
        /// Written during the current superstep.
        next: Vec<AtomicU64>,
    },
}

impl Messenger {
    /// Picks the strategy from the computation's declared knobs.
    pub(crate) fn new(node_count: usize, synchronous: bool, reducer: Option<Reducer>) -> Self {
        match reducer {
            Some(reducer) => {
                let identity = reducer.identity().to_bits();
                let slots = || -> Vec<AtomicU64> {
                    (0..node_count).map(|_| AtomicU64::new(identity)).collect()
                };
                Self::Reducing {
                    reducer,
                    current: slots(),
                    next: slots(),
                }
            }
            None => Self::Queue {
                mailboxes: (0..node_count).map(|_| SegQueue::new()).collect(),
                synchronous,
            },
        }
    }

    /// Prepares mailboxes for superstep `superstep`.
    ///
    /// `received` is the set of nodes that were sent mail during the previous
    /// superstep. Runs on the orchestrator thread between barriers.
    pub(crate) fn init_superstep(&mut self, superstep: usize, received: &BitSet) {
        if superstep == 0 {
            return;
        }
        match self {
            Self::Queue {
                mailboxes,
                synchronous: true,
            } => {
                for node in received.iter_ones() {
                    mailboxes[node].push(Envelope::EndOfRound);
                }
            }
            Self::Queue { .. } => {}
            Self::Reducing {
                reducer,
                current,
                next,
            } => {
                std::mem::swap(current, next);
                let identity = reducer.identity().to_bits();
                for slot in next.iter() {
                    slot.store(identity, Ordering::Relaxed);
                }
            }
        }
    }

    /// Delivers `message` to `target`.
    #[inline]
    pub(crate) fn send(&self, target: NodeId, message: f64) {
        match self {
            Self::Queue { mailboxes, .. } => mailboxes[target].push(Envelope::Payload(message)),
            Self::Reducing { reducer, next, .. } => {
                let reducer = *reducer;
                // The closure always yields `Some`, so the update cannot fail.
                let _ = next[target].fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                    Some(reducer.reduce(f64::from_bits(bits), message).to_bits())
                });
            }
        }
    }

    /// Moves the mail visible to `node` in the current superstep into `out`.
    ///
    /// Callers only drain nodes they own, and only for nodes that were sent
    /// mail in the previous superstep (asynchronous queues excepted).
    pub(crate) fn drain_into(&self, node: NodeId, out: &mut Vec<f64>) {
        match self {
            Self::Queue {
                mailboxes,
                synchronous,
            } => {
                let inbox = &mailboxes[node];
                while let Some(envelope) = inbox.pop() {
                    match envelope {
                        Envelope::Payload(value) => out.push(value),
                        Envelope::EndOfRound if *synchronous => break,
                        Envelope::EndOfRound => {}
                    }
                }
            }
            Self::Reducing { current, .. } => {
                out.push(f64::from_bits(current[node].load(Ordering::Relaxed)));
            }
        }
    }

    /// Returns `true` when the strategy honours round boundaries.
    pub(crate) fn is_round_isolated(&self) -> bool {
        match self {
            Self::Queue { synchronous, .. } => *synchronous,
            Self::Reducing { .. } => true,
        }
    }
}
