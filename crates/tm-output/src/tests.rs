//! Integration tests for tm-output.

use tm_core::{Coord, DirectionHint, EntityId, Millis, RouteId, VehicleStatus};
use tm_frame::{Frame, RenderRecord};

use crate::{FrameRow, ReconcileRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn record(id: &str, bearing: Option<f64>, direction: Option<DirectionHint>) -> RenderRecord {
    RenderRecord {
        entity_id: EntityId::from(id),
        route_id:  RouteId::from("L"),
        status:    VehicleStatus::Stopped,
        position:  Coord::new(-73.99, 40.75),
        bearing,
        direction,
        animating: false,
    }
}

fn frame(index: u64, records: Vec<RenderRecord>) -> Frame {
    Frame { index, time: Millis(index * 16), records }
}

fn frame_row(id: &str, bearing: Option<f64>) -> FrameRow {
    FrameRow::from_record(3, Millis(48), &record(id, bearing, Some(DirectionHint::North)))
}

fn reconcile_row(time_ms: u64) -> ReconcileRow {
    ReconcileRow {
        time_ms,
        placed:     2,
        on_track:   1,
        straight:   0,
        teleported: 1,
        unchanged:  0,
        removed:    3,
    }
}

fn tmp() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use tm_motion::ReconcileSummary;

    use super::*;

    #[test]
    fn frame_row_from_record() {
        let row = frame_row("a", Some(90.0));
        assert_eq!(row.frame, 3);
        assert_eq!(row.time_ms, 48);
        assert_eq!(row.status, "STOPPED");
        assert_eq!(row.direction, Some("N"));
        assert_eq!(row.bearing, Some(90.0));
    }

    #[test]
    fn reconcile_row_counts_removed_ids() {
        let summary = ReconcileSummary {
            placed: 1,
            removed: vec![EntityId::from("x"), EntityId::from("y")],
            ..ReconcileSummary::default()
        };
        let row = ReconcileRow::from_summary(Millis(5_000), &summary);
        assert_eq!(row.time_ms, 5_000);
        assert_eq!(row.placed, 1);
        assert_eq!(row.removed, 2);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use crate::csv::CsvWriter;
    use crate::writer::FrameWriter;

    use super::*;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("frames.csv").exists());
        assert!(dir.path().join("reconciles.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("frames.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["frame", "time_ms", "entity_id", "route_id", "status", "lon", "lat", "bearing", "direction", "animating"]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("reconciles.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            ["time_ms", "placed", "on_track", "straight", "teleported", "unchanged", "removed"]
        );
    }

    #[test]
    fn csv_frame_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_frame(&[frame_row("a", Some(87.5)), frame_row("b", None)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("frames.csv")).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][2], "a");
        assert_eq!(&records[0][7], "87.500");
        assert_eq!(&records[0][8], "N");
        // Missing bearing is an empty cell.
        assert_eq!(&records[1][7], "");
        let lon: f64 = records[1][5].parse().unwrap();
        assert!((lon - (-73.99)).abs() < 1e-12);
    }

    #[test]
    fn csv_reconcile_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_reconcile(&reconcile_row(0)).unwrap();
        w.write_reconcile(&reconcile_row(5_000)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("reconciles.csv")).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][0], "5000");
        assert_eq!(&records[1][6], "3");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_is_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("absent")).is_err());
    }
}

// ── Sink ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sink_tests {
    use tm_frame::FrameSink;
    use tm_motion::ReconcileSummary;

    use crate::{CsvWriter, FrameOutputSink};

    use super::*;

    fn frame_count(dir: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.join("frames.csv")).unwrap();
        rdr.records().map(|r| r.unwrap()[0].to_owned()).collect()
    }

    #[test]
    fn stride_selects_frames() {
        let dir = tmp();
        let mut sink = FrameOutputSink::new(CsvWriter::new(dir.path()).unwrap(), 2);
        for i in 0..5 {
            sink.on_frame(&frame(i, vec![record("a", None, None)]));
        }
        sink.on_stop(Millis(64), 5);
        assert!(sink.take_error().is_none());
        assert_eq!(frame_count(dir.path()), ["0", "2", "4"]);
    }

    #[test]
    fn zero_stride_writes_every_frame() {
        let dir = tmp();
        let mut sink = FrameOutputSink::new(CsvWriter::new(dir.path()).unwrap(), 0);
        for i in 0..3 {
            sink.on_frame(&frame(i, vec![record("a", None, None)]));
        }
        sink.on_stop(Millis(32), 3);
        assert_eq!(frame_count(dir.path()).len(), 3);
    }

    #[test]
    fn reconciles_always_written() {
        let dir = tmp();
        let mut sink = FrameOutputSink::new(CsvWriter::new(dir.path()).unwrap(), 100);
        sink.on_reconcile(Millis(0), &ReconcileSummary::default());
        sink.on_reconcile(Millis(5_000), &ReconcileSummary::default());
        sink.on_stop(Millis(5_000), 0);

        let mut rdr = csv::Reader::from_path(dir.path().join("reconciles.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }

    #[test]
    fn end_to_end_with_frame_loop() {
        use std::sync::Arc;

        use tm_core::{MotionConfig, Snapshot, SnapshotBatch};
        use tm_frame::{FrameLoopBuilder, ManualClock};
        use tm_spatial::RoutePathIndex;

        let dir = tmp();
        let (mut lp, tx) = FrameLoopBuilder::new(MotionConfig::default(), Arc::new(RoutePathIndex::empty()))
            .frame_interval_ms(500)
            .build()
            .unwrap();
        let at = |lat| Snapshot {
            entity_id: EntityId::from("X"),
            route_id:  RouteId::from("L"),
            position:  Coord::new(-73.99, lat),
            bearing:   None,
            status:    VehicleStatus::InTransit,
            stop_id:   None,
            timestamp: 0,
        };
        tx.send(SnapshotBatch::new(vec![at(40.750)])).unwrap();
        tx.send(SnapshotBatch::new(vec![at(40.751)])).unwrap();
        drop(tx);

        let mut sink = FrameOutputSink::new(CsvWriter::new(dir.path()).unwrap(), 1);
        let frames = lp.run(&ManualClock::new(Millis(0)), &mut sink);
        assert!(sink.take_error().is_none());

        // Frames at 0, 500, …, 4000.
        assert_eq!(frames, 9);
        assert_eq!(frame_count(dir.path()).len(), 9);
        let mut rdr = csv::Reader::from_path(dir.path().join("reconciles.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;

    use crate::sqlite::SqliteWriter;
    use crate::writer::FrameWriter;

    use super::*;

    #[test]
    fn sqlite_tables_created() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("frames.db")).unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(tables, ["frames", "reconciles"]);
    }

    #[test]
    fn sqlite_rows_written() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_frame(&[frame_row("a", Some(12.0)), frame_row("b", None)]).unwrap();
        w.write_reconcile(&reconcile_row(5_000)).unwrap();
        w.finish().unwrap();

        let conn = Connection::open(dir.path().join("frames.db")).unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM frames", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 2);
        let nulls: i64 = conn
            .query_row("SELECT COUNT(*) FROM frames WHERE bearing IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(nulls, 1);
        let removed: i64 = conn
            .query_row("SELECT removed FROM reconciles WHERE time_ms = 5000", [], |r| r.get(0))
            .unwrap();
        assert_eq!(removed, 3);
    }
}
