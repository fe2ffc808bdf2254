//! Time-driven replay of a loaded snapshot log.

use std::collections::VecDeque;

use tm_core::{Millis, SnapshotBatch};

use crate::PolledBatch;

/// Releases recorded batches once the caller's clock reaches their poll
/// time, standing in for a live poller.
#[derive(Clone, Debug, Default)]
pub struct Replay {
    pending: VecDeque<PolledBatch>,
}

impl Replay {
    /// `batches` must already be in ascending poll order, as
    /// [`load_batches_reader`](crate::load_batches_reader) returns them.
    pub fn new(batches: Vec<PolledBatch>) -> Self {
        Self { pending: batches.into() }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Poll time of the next batch still to be released.
    pub fn next_poll(&self) -> Option<Millis> {
        self.pending.front().map(|b| b.poll)
    }

    /// Remove and return every batch with `poll <= now`, oldest first.
    pub fn due(&mut self, now: Millis) -> Vec<SnapshotBatch> {
        let mut out = Vec::new();
        while self.pending.front().is_some_and(|b| b.poll <= now) {
            if let Some(b) = self.pending.pop_front() {
                out.push(b.batch);
            }
        }
        out
    }
}
