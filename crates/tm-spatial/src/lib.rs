//! `tm-spatial` — track geometry, route path index, and path resolution.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`polyline`] | `Polyline`, `Projection`, projection and path interpolation  |
//! | [`index`]    | `RoutePathIndex` (per-route polylines + R-tree), builder     |
//! | [`resolver`] | `TrackResolver` trait, `ResolvedPath`, `ProximityResolver`   |
//! | [`loader`]   | `load_geojson_str` / `load_geojson_path` (feature `geojson`) |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `geojson` | GeoJSON route geometry loading (on by default).             |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public value types.    |

pub mod error;
pub mod index;
pub mod polyline;
pub mod resolver;

#[cfg(feature = "geojson")]
pub mod loader;


pub use error::{SpatialError, SpatialResult};
pub use index::{RoutePathIndex, RoutePathIndexBuilder, SegmentHit};
pub use polyline::{Polyline, Projection};
pub use resolver::{ProximityResolver, ResolvedPath, TrackResolver};

#[cfg(feature = "geojson")]
pub use loader::{DEFAULT_ROUTE_PROPERTY, load_geojson_path, load_geojson_str};
