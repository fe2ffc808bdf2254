//! Frame sink trait: where frames and reconcile reports go.

use tm_core::Millis;
use tm_motion::ReconcileSummary;

use crate::Frame;

/// Callbacks invoked by [`FrameLoop`][crate::FrameLoop].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: entity counter
///
/// ```rust,ignore
/// struct Counter { peak: usize }
///
/// impl FrameSink for Counter {
///     fn on_frame(&mut self, frame: &Frame) {
///         self.peak = self.peak.max(frame.len());
///     }
/// }
/// ```
pub trait FrameSink {
    /// Called after each batch is reconciled, before the next frame is
    /// sampled.
    fn on_reconcile(&mut self, _now: Millis, _summary: &ReconcileSummary) {}

    /// Called with every produced frame.
    fn on_frame(&mut self, _frame: &Frame) {}

    /// Called once when the loop exits.
    fn on_stop(&mut self, _now: Millis, _frames: u64) {}
}

/// A [`FrameSink`] that does nothing.
pub struct NoopSink;

impl FrameSink for NoopSink {}
