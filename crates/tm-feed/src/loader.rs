//! CSV snapshot-log loader.
//!
//! # CSV format
//!
//! One row per vehicle report.  `poll_ms` is the monotonic time at which the
//! poll that produced the row completed; rows sharing a `poll_ms` form one
//! batch.
//!
//! ```csv
//! entity_id,route_id,lon,lat,bearing,status,stop_id,timestamp,poll_ms
//! 1L-0412,L,-73.9901,40.7502,,IN_TRANSIT,L06N,1718000000,0
//! 1L-0412,L,-73.9892,40.7503,87.5,STOPPED,L06N,1718000005,5000
//! ```
//!
//! `bearing` and `stop_id` may be empty; an empty `status` means `IN_TRANSIT`.  `status` accepts anything
//! [`VehicleStatus`]'s `FromStr` does (`STOPPED_AT`, `1`, ...).
//!
//! Batches are returned sorted by `poll_ms` whatever the row order, and
//! rows within a batch keep their file order.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use tm_core::{Coord, EntityId, Millis, RouteId, Snapshot, SnapshotBatch, StopId, VehicleStatus};

use crate::FeedError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SnapshotRecord {
    entity_id: String,
    route_id:  String,
    lon:       f64,
    lat:       f64,
    bearing:   Option<f64>,
    status:    String,
    stop_id:   Option<String>,
    timestamp: i64,
    poll_ms:   u64,
}

/// One poll's worth of snapshots and when it arrived.
#[derive(Clone, Debug, PartialEq)]
pub struct PolledBatch {
    pub poll:  Millis,
    pub batch: SnapshotBatch,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every batch from a CSV snapshot log.
pub fn load_batches_csv(path: &Path) -> Result<Vec<PolledBatch>, FeedError> {
    let file = std::fs::File::open(path).map_err(FeedError::Io)?;
    load_batches_reader(file)
}

/// Like [`load_batches_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or reading from stdin.
pub fn load_batches_reader<R: Read>(reader: R) -> Result<Vec<PolledBatch>, FeedError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_poll: BTreeMap<u64, Vec<Snapshot>> = BTreeMap::new();
    let mut rows = 0usize;

    for result in csv_reader.deserialize::<SnapshotRecord>() {
        let row = result.map_err(|e| FeedError::Parse(e.to_string()))?;
        let poll = row.poll_ms;
        by_poll.entry(poll).or_default().push(to_snapshot(row)?);
        rows += 1;
    }

    info!(rows, batches = by_poll.len(), "loaded snapshot log");

    Ok(by_poll
        .into_iter()
        .map(|(poll, snapshots)| PolledBatch { poll: Millis(poll), batch: SnapshotBatch::new(snapshots) })
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_snapshot(r: SnapshotRecord) -> Result<Snapshot, FeedError> {
    if r.entity_id.trim().is_empty() {
        return Err(FeedError::Parse("empty entity_id".into()));
    }
    let position = Coord::new(r.lon, r.lat);
    if !position.is_finite() {
        return Err(FeedError::Parse(format!("entity {:?}: non-finite position", r.entity_id)));
    }
    let status = match r.status.trim() {
        "" => VehicleStatus::default(),
        s => s
            .parse::<VehicleStatus>()
            .map_err(|e| FeedError::Parse(format!("entity {:?}: {e}", r.entity_id)))?,
    };

    Ok(Snapshot {
        entity_id: EntityId::new(r.entity_id.trim()),
        route_id:  RouteId::new(r.route_id.trim()),
        position,
        bearing:   r.bearing,
        status,
        stop_id:   r.stop_id.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).map(StopId::new),
        timestamp: r.timestamp,
    })
}
