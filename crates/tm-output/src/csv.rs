//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `frames.csv`
//! - `reconciles.csv`
//!
//! Absent bearings and direction tags are written as empty cells.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::FrameWriter;
use crate::{FrameRow, OutputResult, ReconcileRow};

/// Writes frame output to two CSV files.
pub struct CsvWriter {
    frames:     Writer<File>,
    reconciles: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut frames = Writer::from_path(dir.join("frames.csv"))?;
        frames.write_record([
            "frame", "time_ms", "entity_id", "route_id", "status", "lon", "lat", "bearing",
            "direction", "animating",
        ])?;

        let mut reconciles = Writer::from_path(dir.join("reconciles.csv"))?;
        reconciles.write_record([
            "time_ms", "placed", "on_track", "straight", "teleported", "unchanged", "removed",
        ])?;

        Ok(Self { frames, reconciles, finished: false })
    }
}

impl FrameWriter for CsvWriter {
    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()> {
        for row in rows {
            self.frames.write_record(&[
                row.frame.to_string(),
                row.time_ms.to_string(),
                row.entity_id.clone(),
                row.route_id.clone(),
                row.status.to_owned(),
                row.lon.to_string(),
                row.lat.to_string(),
                row.bearing.map(|b| format!("{b:.3}")).unwrap_or_default(),
                row.direction.unwrap_or_default().to_owned(),
                (row.animating as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_reconcile(&mut self, row: &ReconcileRow) -> OutputResult<()> {
        self.reconciles.write_record(&[
            row.time_ms.to_string(),
            row.placed.to_string(),
            row.on_track.to_string(),
            row.straight.to_string(),
            row.teleported.to_string(),
            row.unchanged.to_string(),
            row.removed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.frames.flush()?;
        self.reconciles.flush()?;
        Ok(())
    }
}
