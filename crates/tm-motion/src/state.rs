//! One in-flight animated leg.

use tm_core::{Coord, Millis, MotionConfig, RouteId, ease_out_cubic};
use tm_spatial::ResolvedPath;

/// Motion from `start` to `end` beginning at `start_time`.
///
/// When `path` is set the leg follows the route polyline between the two
/// projections; otherwise it is a straight line.  Records are replaced
/// wholesale on every reconcile, never edited in place.
#[derive(Clone, Debug)]
pub struct Animation {
    pub start:      Coord,
    pub end:        Coord,
    pub start_time: Millis,
    pub route_id:   RouteId,
    pub path:       Option<ResolvedPath>,
}

impl Animation {
    /// Linear fraction of the leg completed at `now`, in `[0, 1]`.
    #[inline]
    pub fn progress(&self, now: Millis, config: &MotionConfig) -> f64 {
        config.progress(now.since(self.start_time))
    }

    /// `true` once the leg's full duration has elapsed.
    #[inline]
    pub fn is_finished(&self, now: Millis, config: &MotionConfig) -> bool {
        self.progress(now, config) >= 1.0
    }

    /// Eased progress at `now`; the value positions are interpolated with.
    #[inline]
    pub fn eased(&self, now: Millis, config: &MotionConfig) -> f64 {
        ease_out_cubic(self.progress(now, config))
    }

    /// Drawn position at `now`: eased progress, then path or straight-line
    /// interpolation.
    pub fn position_at(&self, now: Millis, config: &MotionConfig) -> Coord {
        let eased = self.eased(now, config);
        match &self.path {
            Some(path) => path.interpolate(eased),
            None => self.start.lerp(self.end, eased),
        }
    }

    /// Where the leg comes to rest: the target's projection onto the track
    /// for an on-track leg, else the raw target.  Equal to the position
    /// drawn at progress 1.
    pub fn settled_position(&self) -> Coord {
        match &self.path {
            Some(path) => path.end.point,
            None => self.end,
        }
    }

    #[inline]
    pub fn is_on_track(&self) -> bool {
        self.path.is_some()
    }
}
