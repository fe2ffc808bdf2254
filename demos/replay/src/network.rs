//! Embedded route geometry for the demo.
//!
//! Two routes through a small lower-Manhattan-sized grid:
//!
//! - `L`: one crosstown polyline with a jog north at the midpoint.
//! - `G`: a shuttle drawn as a `MultiLineString` of two disjoint branches.

use anyhow::Result;

use tm_spatial::{DEFAULT_ROUTE_PROPERTY, RoutePathIndex, load_geojson_str};

pub const ROUTES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "route_id": "L", "name": "Crosstown" },
      "geometry": {
        "type": "LineString",
        "coordinates": [
          [-74.0030, 40.7390], [-73.9970, 40.7370], [-73.9900, 40.7345],
          [-73.9880, 40.7360], [-73.9820, 40.7335], [-73.9760, 40.7310]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": { "route_id": "G", "name": "Shuttle" },
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[-73.9860, 40.7550], [-73.9860, 40.7450], [-73.9850, 40.7400]],
          [[-73.9790, 40.7520], [-73.9770, 40.7460]]
        ]
      }
    }
  ]
}"#;

/// Load the embedded routes into an index.
pub fn build_index() -> Result<RoutePathIndex> {
    Ok(load_geojson_str(ROUTES_GEOJSON, DEFAULT_ROUTE_PROPERTY)?)
}
