//! Planar coordinate type and the small amount of math the engine needs.
//!
//! Coordinates are `(lon, lat)` degrees treated as a Euclidean plane.  At
//! city scale the distortion is far below what is visible on a map marker,
//! and it keeps projection and interpolation exact and cheap.  `f64` is
//! required: the no-op epsilon (~5e-7°) is below `f32` resolution at
//! longitudes near ±74°.

/// A `(longitude, latitude)` pair in the map's planar projection.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

impl Coord {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Euclidean distance in degrees.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        let d_lon = other.lon - self.lon;
        let d_lat = other.lat - self.lat;
        (d_lon * d_lon + d_lat * d_lat).sqrt()
    }

    /// Linear blend: `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Coord, t: f64) -> Coord {
        Coord {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }

    /// Geographic bearing from `self` to `other`; see [`bearing_deg`].
    #[inline]
    pub fn bearing_to(self, other: Coord) -> f64 {
        bearing_deg(self, other)
    }

    /// `true` if both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for Coord {
    /// `[lon, lat]`, the GeoJSON position order.
    fn from(p: [f64; 2]) -> Self {
        Coord::new(p[0], p[1])
    }
}

impl From<Coord> for [f64; 2] {
    fn from(c: Coord) -> Self {
        [c.lon, c.lat]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Bearing in degrees, `0` = north, increasing clockwise, in `[0, 360)`.
///
/// Computed as `atan2(Δlon, Δlat)`, i.e. the compass convention rather than
/// the unit-circle one.  Identical points give `0`.
pub fn bearing_deg(from: Coord, to: Coord) -> f64 {
    let d_lon = to.lon - from.lon;
    let d_lat = to.lat - from.lat;
    normalize_bearing(d_lon.atan2(d_lat).to_degrees())
}

/// Wrap any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Cubic ease-out: `1 - (1 - p)^3`, with `p` clamped to `[0, 1]`.
///
/// Monotonic, `ease(0) = 0`, `ease(1) = 1`, decelerating towards the end.
#[inline]
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let inv = 1.0 - p;
    1.0 - inv * inv * inv
}
