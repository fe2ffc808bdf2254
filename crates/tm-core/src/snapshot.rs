//! Normalized vehicle reports, as delivered by the external poller.

use crate::{Coord, DirectionHint, EntityId, RouteId, StopId, VehicleStatus};

/// One reported position plus metadata for an entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub entity_id: EntityId,
    pub route_id:  RouteId,
    pub position:  Coord,
    /// Bearing reported by the vehicle itself, if any.
    pub bearing:   Option<f64>,
    pub status:    VehicleStatus,
    pub stop_id:   Option<StopId>,
    /// Feed timestamp (Unix seconds).  Informational only; animation timing
    /// uses the monotonic time at which the batch is reconciled.
    pub timestamp: i64,
}

impl Snapshot {
    /// Direction hint derived from the stop id suffix, if any.
    pub fn direction(&self) -> Option<DirectionHint> {
        self.stop_id.as_ref().and_then(DirectionHint::from_stop_id)
    }
}

/// Every snapshot from one poll.  An entity absent from the batch has left
/// tracking.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotBatch {
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotBatch {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

impl FromIterator<Snapshot> for SnapshotBatch {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Self { snapshots: iter.into_iter().collect() }
    }
}
