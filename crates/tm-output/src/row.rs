//! Plain data row types written by output backends.

use tm_core::Millis;
use tm_frame::RenderRecord;
use tm_motion::ReconcileSummary;

/// One entity in one written frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub frame:     u64,
    pub time_ms:   u64,
    pub entity_id: String,
    pub route_id:  String,
    pub status:    &'static str,
    pub lon:       f64,
    pub lat:       f64,
    /// `None` when the renderer should draw no rotation.
    pub bearing:   Option<f64>,
    /// `"N"`, `"S"`, or `None`.
    pub direction: Option<&'static str>,
    pub animating: bool,
}

impl FrameRow {
    pub fn from_record(frame: u64, time: Millis, r: &RenderRecord) -> Self {
        Self {
            frame,
            time_ms:   time.0,
            entity_id: r.entity_id.as_str().to_owned(),
            route_id:  r.route_id.as_str().to_owned(),
            status:    r.status.as_str(),
            lon:       r.position.lon,
            lat:       r.position.lat,
            bearing:   r.bearing,
            direction: r.direction.map(|d| d.as_str()),
            animating: r.animating,
        }
    }
}

/// Outcome counts for one reconciled batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileRow {
    pub time_ms:    u64,
    pub placed:     u64,
    pub on_track:   u64,
    pub straight:   u64,
    pub teleported: u64,
    pub unchanged:  u64,
    pub removed:    u64,
}

impl ReconcileRow {
    pub fn from_summary(time: Millis, s: &ReconcileSummary) -> Self {
        Self {
            time_ms:    time.0,
            placed:     s.placed as u64,
            on_track:   s.on_track as u64,
            straight:   s.straight as u64,
            teleported: s.teleported as u64,
            unchanged:  s.unchanged as u64,
            removed:    s.removed.len() as u64,
        }
    }
}
