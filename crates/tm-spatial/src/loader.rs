//! GeoJSON route geometry loader (feature `geojson`).
//!
//! # Input format
//!
//! A `FeatureCollection` (or a single `Feature`) whose features carry a
//! `LineString` or `MultiLineString` geometry and a route property:
//!
//! ```json
//! { "type": "FeatureCollection", "features": [
//!   { "type": "Feature",
//!     "properties": { "route_id": "L" },
//!     "geometry": { "type": "LineString",
//!                   "coordinates": [[-73.99, 40.75], [-73.98, 40.75]] } }
//! ] }
//! ```
//!
//! Each line of a `MultiLineString` becomes its own candidate polyline.
//! Numeric route properties are stringified.  Features missing geometry or
//! the route property, other geometry types, and lines with fewer than two
//! valid positions are skipped with a warning rather than failing the load.

use std::path::Path;
use std::str::FromStr;

use geojson::{Feature, GeoJson, Value};
use tracing::{info, warn};

use tm_core::{Coord, RouteId};

use crate::{Polyline, RoutePathIndex, RoutePathIndexBuilder, SpatialError, SpatialResult};

/// Property read when the caller has no better name.
pub const DEFAULT_ROUTE_PROPERTY: &str = "route_id";

/// Load a route path index from a GeoJSON file.
pub fn load_geojson_path(path: &Path, route_property: &str) -> SpatialResult<RoutePathIndex> {
    let text = std::fs::read_to_string(path)?;
    load_geojson_str(&text, route_property)
}

/// Like [`load_geojson_path`] but parses an in-memory document.
pub fn load_geojson_str(text: &str, route_property: &str) -> SpatialResult<RoutePathIndex> {
    let features = match GeoJson::from_str(text)? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(SpatialError::Format(
                "bare geometry has no route property; expected Feature or FeatureCollection".into(),
            ));
        }
    };

    let mut builder = RoutePathIndexBuilder::new();
    let mut skipped = 0usize;

    for (i, feature) in features.iter().enumerate() {
        let Some(route) = route_of(feature, route_property) else {
            warn!(feature = i, property = route_property, "feature has no route property; skipped");
            skipped += 1;
            continue;
        };

        for line in lines_of(feature, i) {
            match Polyline::new(line) {
                Ok(pl) => builder.add_polyline(route.clone(), pl),
                Err(e) => {
                    warn!(feature = i, route = %route, error = %e, "unusable line; skipped");
                    skipped += 1;
                }
            }
        }
    }

    info!(
        features = features.len(),
        polylines = builder.polyline_count(),
        skipped,
        "loaded route geometry"
    );
    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn route_of(feature: &Feature, property: &str) -> Option<RouteId> {
    match feature.property(property)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(RouteId::new(s.as_str())),
        serde_json::Value::Number(n) => Some(RouteId::new(n.to_string())),
        _ => None,
    }
}

/// Every coordinate run in `feature`'s geometry, as `[lon, lat]` coords.
fn lines_of(feature: &Feature, i: usize) -> Vec<Vec<Coord>> {
    let Some(geometry) = &feature.geometry else {
        warn!(feature = i, "feature has no geometry; skipped");
        return vec![];
    };

    match &geometry.value {
        Value::LineString(line) => vec![to_coords(line)],
        Value::MultiLineString(lines) => lines.iter().map(|l| to_coords(l)).collect(),
        other => {
            warn!(feature = i, kind = geometry_kind(other), "unsupported geometry type; skipped");
            vec![]
        }
    }
}

/// Positions with fewer than two components are dropped.
fn to_coords(line: &[Vec<f64>]) -> Vec<Coord> {
    line.iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Coord::new(pos[0], pos[1]))
        .collect()
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_)              => "Point",
        Value::MultiPoint(_)         => "MultiPoint",
        Value::LineString(_)         => "LineString",
        Value::MultiLineString(_)    => "MultiLineString",
        Value::Polygon(_)            => "Polygon",
        Value::MultiPolygon(_)       => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
