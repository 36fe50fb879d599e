// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cooperative cancellation.
//!
//! Polled once per node before its compute call. A compute call that has
//! already started always finishes; a timeout only stops new node
//! computations from being scheduled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared stop signal with an optional deadline.
///
/// Clones observe the same flag, so a caller can keep one clone and hand the
/// other to [`crate::Pregel::with_termination`].
#[derive(Clone, Debug, Default)]
pub struct TerminationFlag {
    stopped: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl TerminationFlag {
    /// A flag that only stops when [`stop`](Self::stop) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag that additionally stops once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            stopped: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Requests the run to stop scheduling node computations.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Returns `true` while work may still be scheduled.
    #[inline]
    pub fn running(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return false;
        }
        self.deadline.map_or(true, |deadline| Instant::now() < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_stop_signal() {
        let flag = TerminationFlag::new();
        let handle = flag.clone();
        assert!(flag.running());
        handle.stop();
        assert!(!flag.running());
    }

    #[test]
    fn zero_timeout_is_already_expired() {
        let flag = TerminationFlag::with_timeout(Duration::ZERO);
        assert!(!flag.running());
    }

    #[test]
    fn generous_timeout_keeps_running() {
        let flag = TerminationFlag::with_timeout(Duration::from_secs(3_600));
        assert!(flag.running());
    }
}
