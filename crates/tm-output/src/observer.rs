//! `FrameOutputSink<W>` — bridges `FrameSink` to a `FrameWriter`.

use tracing::warn;

use tm_core::Millis;
use tm_frame::{Frame, FrameSink};
use tm_motion::ReconcileSummary;

use crate::row::{FrameRow, ReconcileRow};
use crate::writer::FrameWriter;
use crate::{OutputError, OutputResult};

/// A [`FrameSink`] that writes every `frame_stride`-th frame and every
/// reconcile summary to any [`FrameWriter`] backend.
///
/// Errors from the writer are stored internally because `FrameSink` methods
/// have no return value.  After the loop returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct FrameOutputSink<W: FrameWriter> {
    writer:       W,
    frame_stride: u64,
    last_error:   Option<OutputError>,
}

impl<W: FrameWriter> FrameOutputSink<W> {
    /// Write frames whose index is a multiple of `frame_stride` (`0` and `1`
    /// both mean every frame).
    pub fn new(writer: W, frame_stride: u64) -> Self {
        Self { writer, frame_stride: frame_stride.max(1), last_error: None }
    }

    /// Take the stored write error (if any) after the loop returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "frame output failed; further errors suppressed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: FrameWriter> FrameSink for FrameOutputSink<W> {
    fn on_reconcile(&mut self, now: Millis, summary: &ReconcileSummary) {
        let result = self.writer.write_reconcile(&ReconcileRow::from_summary(now, summary));
        self.store_err(result);
    }

    fn on_frame(&mut self, frame: &Frame) {
        if !frame.index.is_multiple_of(self.frame_stride) || frame.is_empty() {
            return;
        }
        let rows: Vec<FrameRow> = frame
            .records
            .iter()
            .map(|r| FrameRow::from_record(frame.index, frame.time, r))
            .collect();
        let result = self.writer.write_frame(&rows);
        self.store_err(result);
    }

    fn on_stop(&mut self, _now: Millis, _frames: u64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
