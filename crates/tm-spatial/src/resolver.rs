//! Track-constrained path resolution.
//!
//! Given where a vehicle is drawn now and where the feed says it is, pick the
//! route polyline both points plausibly lie on, so the animation can follow
//! the track instead of cutting corners.
//!
//! # Pluggability
//!
//! The animation store calls resolution through the [`TrackResolver`]
//! trait.  [`ProximityResolver`] is the default; applications with better
//! knowledge (trip shapes, stop sequences) can supply their own.

use std::sync::Arc;

use tm_core::{Coord, RouteId};

use crate::{Polyline, Projection, RoutePathIndex};

/// A polyline plus the projections of both endpoints onto it.
#[derive(Clone, Debug)]
pub struct ResolvedPath {
    pub polyline: Arc<Polyline>,
    pub start:    Projection,
    pub end:      Projection,
}

impl ResolvedPath {
    /// Point at `progress` (already eased) of the way along the path.
    #[inline]
    pub fn interpolate(&self, progress: f64) -> Coord {
        self.polyline.interpolate(&self.start, &self.end, progress)
    }

    /// Segment the animation occupies at `progress` (already eased).
    pub fn segment_at(&self, progress: f64) -> usize {
        if self.start.segment == self.end.segment || progress <= 0.0 {
            return self.start.segment;
        }
        if progress >= 1.0 {
            return self.end.segment;
        }
        let from = self.polyline.measure(&self.start);
        let to   = self.polyline.measure(&self.end);
        self.polyline.segment_at_measure(from + (to - from) * progress)
    }

    /// Track tangent (vertex order) under the animation at `progress`.
    #[inline]
    pub fn tangent_at(&self, progress: f64) -> Option<f64> {
        self.polyline.tangent_bearing_at(self.segment_at(progress))
    }

    /// `true` when travel runs against the polyline's vertex order.
    #[inline]
    pub fn is_backward(&self) -> bool {
        self.end.is_before(&self.start)
    }

    /// `true` when both endpoints project to the same place, so the path
    /// carries no travel direction.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        !self.end.is_before(&self.start) && !self.start.is_before(&self.end)
    }
}

/// Pluggable track resolver.
///
/// Implementations must be `Send + Sync` so an engine can be moved to a
/// render thread.
pub trait TrackResolver: Send + Sync {
    /// Resolve the path between `start` and `end` on `route`, or `None` if
    /// no candidate polyline is a plausible fit.
    fn resolve(
        &self,
        index: &RoutePathIndex,
        route: &RouteId,
        start: Coord,
        end:   Coord,
    ) -> Option<ResolvedPath>;
}

/// Picks the polyline minimising the sum of both endpoints' projection
/// distances, and accepts it only if *each* distance is below
/// `max_distance`.
///
/// The per-endpoint check keeps an animation from snapping onto the wrong
/// branch when geometry is sparse or the jump is genuinely off-track.  It
/// can also reject short connecting segments that are missing from the
/// geometry; tune `max_distance` for the network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProximityResolver {
    pub max_distance: f64,
}

impl ProximityResolver {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }
}

impl TrackResolver for ProximityResolver {
    fn resolve(
        &self,
        index: &RoutePathIndex,
        route: &RouteId,
        start: Coord,
        end:   Coord,
    ) -> Option<ResolvedPath> {
        let mut best: Option<(f64, &Arc<Polyline>, Projection, Projection)> = None;

        for polyline in index.paths_for(route) {
            let s = polyline.project(start);
            let e = polyline.project(end);
            let score = s.distance + e.distance;
            if best.as_ref().is_none_or(|(b, ..)| score < *b) {
                best = Some((score, polyline, s, e));
            }
        }

        let (_, polyline, start, end) = best?;
        if start.distance < self.max_distance && end.distance < self.max_distance {
            Some(ResolvedPath { polyline: Arc::clone(polyline), start, end })
        } else {
            None
        }
    }
}
