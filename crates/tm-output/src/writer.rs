//! The `FrameWriter` trait implemented by all backend writers.

use crate::{FrameRow, OutputResult, ReconcileRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the sink's perspective: errors are
/// stored and retrieved with [`FrameOutputSink::take_error`].
///
/// [`FrameOutputSink::take_error`]: crate::FrameOutputSink::take_error
pub trait FrameWriter {
    /// Write every row of one frame.
    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()>;

    /// Write one reconcile summary row.
    fn write_reconcile(&mut self, row: &ReconcileRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
