//! The `FrameLoop` struct and its paced run loop.

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{debug, info};

use tm_core::{Millis, SnapshotBatch};
use tm_motion::MotionEngine;
use tm_spatial::TrackResolver;

use crate::{CancelToken, Clock, Frame, FrameSink, produce_frame};

/// Owns the motion engine and the receiving end of the batch channel.
///
/// Batches sent by the poller are only applied at the start of a frame, on
/// the loop's own thread, so reconciliation and sampling never interleave.
///
/// Create via [`FrameLoopBuilder`][crate::FrameLoopBuilder].
pub struct FrameLoop<R: TrackResolver> {
    /// Animation state and its reconciliation logic.
    pub engine: MotionEngine<R>,

    batches:           Receiver<SnapshotBatch>,
    frame_interval_ms: u64,
    cancel:            CancelToken,
    frames:            u64,
    disconnected:      bool,
}

impl<R: TrackResolver> FrameLoop<R> {
    pub(crate) fn new(
        engine:            MotionEngine<R>,
        batches:           Receiver<SnapshotBatch>,
        frame_interval_ms: u64,
        cancel:            CancelToken,
    ) -> Self {
        Self { engine, batches, frame_interval_ms, cancel, frames: 0, disconnected: false }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// A handle that stops [`run`](Self::run) before its next frame.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// `true` once every sender of the batch channel has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Run frames paced by `clock` until cancelled, or until the batch
    /// channel is closed and every animation has settled.
    ///
    /// Returns the number of frames produced by this call.
    pub fn run<C: Clock, S: FrameSink>(&mut self, clock: &C, sink: &mut S) -> u64 {
        let first = self.frames;
        let mut now = clock.now();
        info!(start = %now, interval_ms = self.frame_interval_ms, "frame loop started");

        loop {
            if self.cancel.is_cancelled() {
                info!(now = %now, "frame loop cancelled");
                break;
            }

            now = clock.now();
            self.step(now, sink);

            if self.disconnected && self.engine.store.animating_count() == 0 {
                info!(now = %now, "feed closed and all animations settled");
                break;
            }
            clock.sleep_until(now + self.frame_interval_ms);
        }

        let produced = self.frames - first;
        sink.on_stop(now, produced);
        produced
    }

    /// Produce exactly one frame at `now`: drain pending batches, sample,
    /// settle, and emit.
    ///
    /// Useful for tests and for callers that drive their own render loop.
    pub fn step<S: FrameSink>(&mut self, now: Millis, sink: &mut S) -> Frame {
        self.drain_batches(now, sink);

        let frame = Frame {
            index:   self.frames,
            time:    now,
            records: produce_frame(&mut self.engine, now),
        };
        self.frames += 1;
        sink.on_frame(&frame);
        frame
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Reconcile every batch waiting in the channel, oldest first.
    fn drain_batches<S: FrameSink>(&mut self, now: Millis, sink: &mut S) -> usize {
        let mut drained = 0;
        loop {
            match self.batches.try_recv() {
                Ok(batch) => {
                    let summary = self.engine.reconcile(&batch, now);
                    sink.on_reconcile(now, &summary);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!(now = %now, "batch channel disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        drained
    }
}
