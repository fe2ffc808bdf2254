//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `tm-spatial`.  Only load-time operations fail; every
/// per-frame query is infallible.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("polyline needs at least 2 points, got {points}")]
    DegeneratePolyline { points: usize },

    #[error("polyline contains a non-finite coordinate")]
    NonFiniteCoordinate,

    #[error("unsupported geometry document: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
