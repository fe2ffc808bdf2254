//! `tm-output` — frame and reconcile writers for transit_motion.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                      |
//! |-----------|---------|------------------------------------|
//! | *(none)*  | CSV     | `frames.csv`, `reconciles.csv`     |
//! | `sqlite`  | SQLite  | `frames.db`                        |
//!
//! Both implement [`FrameWriter`] and are driven by [`FrameOutputSink`],
//! which implements `tm_frame::FrameSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tm_output::{CsvWriter, FrameOutputSink};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut sink = FrameOutputSink::new(writer, 10);
//! frame_loop.run(&clock, &mut sink);
//! if let Some(e) = sink.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::FrameOutputSink;
pub use row::{FrameRow, ReconcileRow};
pub use writer::FrameWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
