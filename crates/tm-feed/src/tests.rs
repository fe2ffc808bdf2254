//! Unit tests for tm-feed.

use std::io::{Cursor, Write};

use tm_core::{Coord, DirectionHint, EntityId, Millis, VehicleStatus};

use crate::{FeedError, PolledBatch, Replay, load_batches_csv, load_batches_reader};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HEADER: &str = "entity_id,route_id,lon,lat,bearing,status,stop_id,timestamp,poll_ms\n";

fn load(body: &str) -> Result<Vec<PolledBatch>, FeedError> {
    load_batches_reader(Cursor::new(format!("{HEADER}{body}")))
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    #[test]
    fn groups_rows_by_poll() {
        let batches = load(
            "a,L,-73.99,40.75,,IN_TRANSIT,L06N,100,0\n\
             b,L,-73.98,40.75,90,STOPPED_AT,L08S,100,0\n\
             a,L,-73.989,40.75,,IN_TRANSIT,L06N,105,5000\n",
        )
        .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].poll, Millis(0));
        assert_eq!(batches[0].batch.len(), 2);
        assert_eq!(batches[1].poll, Millis(5_000));
        assert_eq!(batches[1].batch.snapshots[0].position, Coord::new(-73.989, 40.75));
    }

    #[test]
    fn batches_sorted_by_poll_time() {
        let batches = load(
            "a,L,0.0,0.0,,,,0,9000\n\
             a,L,0.0,0.0,,,,0,1000\n\
             a,L,0.0,0.0,,,,0,5000\n",
        )
        .unwrap();
        let polls: Vec<u64> = batches.iter().map(|b| b.poll.0).collect();
        assert_eq!(polls, vec![1_000, 5_000, 9_000]);
    }

    #[test]
    fn optional_cells() {
        let batches = load(
            "a,L,-73.99,40.75,,,,100,0\n\
             b,L,-73.98,40.75,87.5,1,L08S,100,0\n",
        )
        .unwrap();
        let a = &batches[0].batch.snapshots[0];
        assert_eq!(a.bearing, None);
        assert_eq!(a.stop_id, None);
        assert_eq!(a.status, VehicleStatus::InTransit);
        assert_eq!(a.direction(), None);

        let b = &batches[0].batch.snapshots[1];
        assert_eq!(b.entity_id, EntityId::from("b"));
        assert_eq!(b.bearing, Some(87.5));
        assert_eq!(b.status, VehicleStatus::Stopped);
        assert_eq!(b.direction(), Some(DirectionHint::South));
        assert_eq!(b.timestamp, 100);
    }

    #[test]
    fn bad_status_is_parse_error() {
        let err = load("a,L,0.0,0.0,,SIDEWAYS,,0,0\n").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let err = load("a,L,west,0.0,,,,0,0\n").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn empty_log_has_no_batches() {
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn reads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{HEADER}a,L,-73.99,40.75,,IN_TRANSIT,,0,0\n").unwrap();
        let batches = load_batches_csv(f.path()).unwrap();
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_batches_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }
}

// ── Replay ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod replay {
    use super::*;

    #[test]
    fn releases_batches_as_time_passes() {
        let batches = load(
            "a,L,0.0,0.0,,,,0,0\n\
             a,L,0.0,0.001,,,,0,5000\n\
             a,L,0.0,0.002,,,,0,10000\n",
        )
        .unwrap();
        let mut r = Replay::new(batches);

        assert_eq!(r.due(Millis(0)).len(), 1);
        assert!(r.due(Millis(4_999)).is_empty());
        assert_eq!(r.next_poll(), Some(Millis(5_000)));
        // A late caller gets every overdue batch, oldest first.
        let late = r.due(Millis(12_000));
        assert_eq!(late.len(), 2);
        assert_eq!(late[0].snapshots[0].position.lat, 0.001);
        assert!(r.is_empty());
        assert_eq!(r.next_poll(), None);
    }
}
