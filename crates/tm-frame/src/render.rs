//! What the renderer receives each frame.

use tm_core::{Coord, DirectionHint, EntityId, Millis, RouteId, VehicleStatus};

/// Drawing instructions for one entity in one frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderRecord {
    pub entity_id: EntityId,
    pub route_id:  RouteId,
    pub status:    VehicleStatus,
    pub position:  Coord,
    /// Final marker rotation in degrees, offset already applied.  `None`
    /// means draw without rotation.
    pub bearing:   Option<f64>,
    pub direction: Option<DirectionHint>,
    /// `true` while a leg is still in progress at this frame.
    pub animating: bool,
}

/// One sampled frame, ordered by entity id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Zero-based count of frames produced by the loop.
    pub index:   u64,
    pub time:    Millis,
    pub records: Vec<RenderRecord>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Linear lookup by entity id.
    pub fn get(&self, id: &EntityId) -> Option<&RenderRecord> {
        self.records.iter().find(|r| &r.entity_id == id)
    }
}
