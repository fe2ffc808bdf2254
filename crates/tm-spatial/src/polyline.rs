//! Immutable track polylines and the geometry evaluated against them.
//!
//! # Path measure
//!
//! Every polyline precomputes the cumulative planar length up to each
//! vertex:
//!
//! ```text
//! cumulative[0] = 0
//! cumulative[i] = cumulative[i-1] + |points[i] - points[i-1]|
//! ```
//!
//! A [`Projection`] at `(segment, t)` therefore has a scalar *measure*
//! `cumulative[segment] + t * segment_length`, and interpolating between two
//! projections reduces to blending two measures and mapping the result back
//! to a point.  Because the measure is physical length rather than vertex
//! count, travel speed looks uniform however densely a track is digitised.

use tm_core::{Coord, bearing_deg};

use crate::{SpatialError, SpatialResult};

// ── Projection ────────────────────────────────────────────────────────────────

/// The closest point on a polyline to some query coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    /// Index of the segment `points[segment] → points[segment + 1]`.
    pub segment: usize,
    /// Position within the segment, in `[0, 1]`.
    pub t: f64,
    /// The projected point itself.
    pub point: Coord,
    /// Distance from the query coordinate to `point`.
    pub distance: f64,
}

impl Projection {
    /// `true` if `self` lies strictly before `other` in vertex order.
    #[inline]
    pub fn is_before(&self, other: &Projection) -> bool {
        (self.segment, self.t) < (other.segment, other.t)
    }
}

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An ordered run of at least two coordinates describing one physical track.
///
/// Construction is the only fallible step; a `Polyline` that exists is always
/// safe to project onto and interpolate along.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points:     Vec<Coord>,
    /// `cumulative[i]` = path length from `points[0]` to `points[i]`.
    cumulative: Vec<f64>,
}

impl Polyline {
    /// Build a polyline, rejecting fewer than two points or non-finite
    /// coordinates.
    pub fn new(points: Vec<Coord>) -> SpatialResult<Self> {
        if points.len() < 2 {
            return Err(SpatialError::DegeneratePolyline { points: points.len() });
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(SpatialError::NonFiniteCoordinate);
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for w in points.windows(2) {
            acc += w[0].distance(w[1]);
            cumulative.push(acc);
        }

        Ok(Self { points, cumulative })
    }

    #[inline]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Endpoints of segment `i`.
    ///
    /// # Panics
    /// Panics if `i >= segment_count()`.
    #[inline]
    pub fn segment(&self, i: usize) -> (Coord, Coord) {
        (self.points[i], self.points[i + 1])
    }

    /// Total planar length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    #[inline]
    fn segment_length(&self, i: usize) -> f64 {
        self.cumulative[i + 1] - self.cumulative[i]
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// Project `p` onto segment `i`, with `t` clamped to the segment.
    pub fn project_onto_segment(&self, p: Coord, i: usize) -> Projection {
        let (a, b) = self.segment(i);
        let d_lon = b.lon - a.lon;
        let d_lat = b.lat - a.lat;
        let len_2 = d_lon * d_lon + d_lat * d_lat;

        let t = if len_2 > 0.0 {
            (((p.lon - a.lon) * d_lon + (p.lat - a.lat) * d_lat) / len_2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let point = a.lerp(b, t);

        Projection { segment: i, t, point, distance: p.distance(point) }
    }

    /// Nearest point on the whole polyline to `p`.
    ///
    /// Ties keep the earliest segment, so results are deterministic.
    pub fn project(&self, p: Coord) -> Projection {
        let mut best = self.project_onto_segment(p, 0);
        for i in 1..self.segment_count() {
            let candidate = self.project_onto_segment(p, i);
            if candidate.distance < best.distance {
                best = candidate;
            }
        }
        best
    }

    // ── Path measure ──────────────────────────────────────────────────────

    /// Distance along the polyline from `points[0]` to `proj.point`.
    #[inline]
    pub fn measure(&self, proj: &Projection) -> f64 {
        self.cumulative[proj.segment] + proj.t * self.segment_length(proj.segment)
    }

    /// The point at distance `m` along the polyline (clamped to its ends).
    pub fn point_at_measure(&self, m: f64) -> Coord {
        let m = m.clamp(0.0, self.length());
        let idx = self.segment_at_measure(m);

        let seg_len = self.segment_length(idx);
        let (a, b) = self.segment(idx);
        if seg_len > 0.0 {
            a.lerp(b, ((m - self.cumulative[idx]) / seg_len).clamp(0.0, 1.0))
        } else {
            a
        }
    }

    /// Segment containing distance `m` along the polyline (clamped to its
    /// ends).  A measure landing exactly on a vertex picks the segment
    /// starting there.
    pub fn segment_at_measure(&self, m: f64) -> usize {
        // Last vertex whose cumulative length is <= m, kept on a real segment.
        self.cumulative
            .partition_point(|&c| c <= m)
            .saturating_sub(1)
            .min(self.segment_count() - 1)
    }

    /// Point at fraction `progress` of the way from `start` to `end`, walking
    /// along the polyline forwards or backwards as their order dictates.
    ///
    /// `progress` is clamped to `[0, 1]`; the two extremes return the
    /// projected points exactly.
    pub fn interpolate(&self, start: &Projection, end: &Projection, progress: f64) -> Coord {
        let progress = progress.clamp(0.0, 1.0);
        if progress <= 0.0 {
            return start.point;
        }
        if progress >= 1.0 {
            return end.point;
        }

        // Same segment: blend the projected points directly.
        if start.segment == end.segment {
            return start.point.lerp(end.point, progress);
        }

        let from = self.measure(start);
        let to   = self.measure(end);
        self.point_at_measure(from + (to - from) * progress)
    }

    // ── Direction ─────────────────────────────────────────────────────────

    /// Bearing of segment `i` in vertex order, or `None` if it has zero
    /// length.
    pub fn segment_bearing(&self, i: usize) -> Option<f64> {
        if self.segment_length(i) <= 0.0 {
            return None;
        }
        let (a, b) = self.segment(i);
        Some(bearing_deg(a, b))
    }

    /// Local tangent bearing (vertex order) at `proj`.
    ///
    /// Zero-length segments borrow the direction of the nearest real segment
    /// after them, then before them.  `None` only if every vertex coincides.
    pub fn tangent_bearing(&self, proj: &Projection) -> Option<f64> {
        self.tangent_bearing_at(proj.segment)
    }

    /// Like [`tangent_bearing`](Self::tangent_bearing), starting from
    /// segment `i`.
    pub fn tangent_bearing_at(&self, i: usize) -> Option<f64> {
        let i = i.min(self.segment_count() - 1);
        (i..self.segment_count())
            .chain((0..i).rev())
            .find_map(|s| self.segment_bearing(s))
    }
}
