//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `frames.db` file in the configured output directory with
//! two tables: `frames` and `reconciles`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::FrameWriter;
use crate::{FrameRow, OutputResult, ReconcileRow};

/// Writes frame output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `frames.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("frames.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS frames (
                 frame     INTEGER NOT NULL,
                 time_ms   INTEGER NOT NULL,
                 entity_id TEXT    NOT NULL,
                 route_id  TEXT    NOT NULL,
                 status    TEXT    NOT NULL,
                 lon       REAL    NOT NULL,
                 lat       REAL    NOT NULL,
                 bearing   REAL,
                 direction TEXT,
                 animating INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS reconciles (
                 time_ms    INTEGER NOT NULL,
                 placed     INTEGER NOT NULL,
                 on_track   INTEGER NOT NULL,
                 straight   INTEGER NOT NULL,
                 teleported INTEGER NOT NULL,
                 unchanged  INTEGER NOT NULL,
                 removed    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl FrameWriter for SqliteWriter {
    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO frames \
                 (frame, time_ms, entity_id, route_id, status, lon, lat, bearing, direction, animating) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.frame as i64,
                    row.time_ms as i64,
                    row.entity_id,
                    row.route_id,
                    row.status,
                    row.lon,
                    row.lat,
                    row.bearing,
                    row.direction,
                    row.animating as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_reconcile(&mut self, row: &ReconcileRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO reconciles \
             (time_ms, placed, on_track, straight, teleported, unchanged, removed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.time_ms as i64,
                row.placed as i64,
                row.on_track as i64,
                row.straight as i64,
                row.teleported as i64,
                row.unchanged as i64,
                row.removed as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
