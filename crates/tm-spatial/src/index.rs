//! The route path index and its builder.
//!
//! # Data layout
//!
//! Each route id maps to a [`RoutePaths`] entry holding:
//!
//! - the route's candidate polylines, shared via `Arc` so animation records
//!   can hold a reference to the path they follow without copying it;
//! - an R-tree (via `rstar`) of every non-degenerate segment of those
//!   polylines, tagged with `(polyline, segment)` indices.  Used for the
//!   nearest-track lookup behind the bearing fallback.
//!
//! The index is write-once: built by [`RoutePathIndexBuilder`], then only
//! read.  It holds no interior mutability, so `&RoutePathIndex` (or an
//! `Arc<RoutePathIndex>`) can be shared freely.

use std::collections::HashMap;
use std::sync::Arc;

use rstar::primitives::{GeomWithData, Line};
use rstar::{PointDistance, RTree};
use tracing::info;

use tm_core::{Coord, RouteId};

use crate::{Polyline, Projection};

// ── R-tree segment entry ──────────────────────────────────────────────────────

/// `(polyline index, segment index)` within one route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SegmentRef {
    polyline: usize,
    segment:  usize,
}

/// A `[lon, lat]` line segment stored in a route's R-tree.
type SegmentEntry = GeomWithData<Line<[f64; 2]>, SegmentRef>;

// ── RoutePaths ────────────────────────────────────────────────────────────────

/// All geometry for one route.
struct RoutePaths {
    polylines: Vec<Arc<Polyline>>,
    segments:  RTree<SegmentEntry>,
}

impl RoutePaths {
    fn new(polylines: Vec<Arc<Polyline>>) -> Self {
        let entries: Vec<SegmentEntry> = polylines
            .iter()
            .enumerate()
            .flat_map(|(p, pl)| {
                (0..pl.segment_count()).filter_map(move |s| {
                    let (a, b) = pl.segment(s);
                    // rstar divides by segment length; zero-length segments are
                    // covered by their neighbours anyway.
                    (a != b).then(|| {
                        GeomWithData::new(
                            Line::new(a.into(), b.into()),
                            SegmentRef { polyline: p, segment: s },
                        )
                    })
                })
            })
            .collect();

        Self { polylines, segments: RTree::bulk_load(entries) }
    }
}

/// The nearest track segment to a query point.
#[derive(Clone, Debug)]
pub struct SegmentHit<'a> {
    pub polyline:   &'a Arc<Polyline>,
    pub projection: Projection,
}

// ── RoutePathIndex ────────────────────────────────────────────────────────────

/// Route id → candidate polylines, read-only after construction.
///
/// A route may have several disjoint polylines (branches, shuttles, loops);
/// none are assumed to connect.
#[derive(Default)]
pub struct RoutePathIndex {
    routes: HashMap<RouteId, RoutePaths>,
}

impl RoutePathIndex {
    /// An index with no routes.  Every lookup misses, so every animation
    /// degrades to straight-line motion.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.routes.values().map(|r| r.polylines.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn contains_route(&self, route: &RouteId) -> bool {
        self.routes.contains_key(route)
    }

    /// Iterator over every route id in the index (arbitrary order).
    pub fn route_ids(&self) -> impl Iterator<Item = &RouteId> + '_ {
        self.routes.keys()
    }

    /// Candidate polylines for `route`; empty if the route is unknown.
    pub fn paths_for(&self, route: &RouteId) -> &[Arc<Polyline>] {
        self.routes
            .get(route)
            .map(|r| r.polylines.as_slice())
            .unwrap_or(&[])
    }

    /// Nearest segment of any of `route`'s polylines to `p`, if it lies
    /// within `max_distance`.
    pub fn nearest_segment(
        &self,
        route:        &RouteId,
        p:            Coord,
        max_distance: f64,
    ) -> Option<SegmentHit<'_>> {
        let paths = self.routes.get(route)?;
        let query: [f64; 2] = p.into();
        let entry = paths.segments.nearest_neighbor(&query)?;
        if entry.distance_2(&query) > max_distance * max_distance {
            return None;
        }

        let polyline = &paths.polylines[entry.data.polyline];
        let projection = polyline.project_onto_segment(p, entry.data.segment);
        Some(SegmentHit { polyline, projection })
    }
}

// ── RoutePathIndexBuilder ─────────────────────────────────────────────────────

/// Construct a [`RoutePathIndex`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tm_core::{Coord, RouteId};
/// use tm_spatial::{Polyline, RoutePathIndexBuilder};
///
/// let mut b = RoutePathIndexBuilder::new();
/// let line = Polyline::new(vec![Coord::new(-73.99, 40.75), Coord::new(-73.98, 40.76)]).unwrap();
/// b.add_polyline(RouteId::from("L"), line);
/// let index = b.build();
/// assert_eq!(index.paths_for(&RouteId::from("L")).len(), 1);
/// ```
#[derive(Default)]
pub struct RoutePathIndexBuilder {
    routes: HashMap<RouteId, Vec<Polyline>>,
}

impl RoutePathIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one candidate polyline to `route`.
    pub fn add_polyline(&mut self, route: RouteId, polyline: Polyline) {
        self.routes.entry(route).or_default().push(polyline);
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Consume the builder, bulk-loading one segment R-tree per route.
    pub fn build(self) -> RoutePathIndex {
        let routes: HashMap<RouteId, RoutePaths> = self
            .routes
            .into_iter()
            .map(|(id, lines)| {
                let shared = lines.into_iter().map(Arc::new).collect();
                (id, RoutePaths::new(shared))
            })
            .collect();

        let index = RoutePathIndex { routes };
        info!(
            routes = index.route_count(),
            polylines = index.polyline_count(),
            "route path index built"
        );
        index
    }
}
