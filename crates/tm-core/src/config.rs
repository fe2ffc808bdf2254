//! Engine configuration.
//!
//! Typically built with `Default` and adjusted, or loaded from a JSON file by
//! the application (with the `serde` feature) and passed to the frame loop.

use crate::{CoreError, CoreResult};

/// Thresholds and timings shared by reconciliation and frame sampling.
///
/// Distances are planar degrees (see [`Coord`](crate::Coord)).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Duration of one animated leg.  Default: 4000 ms.
    pub animation_duration_ms: u64,

    /// Straight-line displacement above which a move is rendered as an
    /// instant teleport.  Default: 0.02°.
    pub snap_threshold: f64,

    /// Maximum distance from a polyline for a point to count as "on track"
    /// (resolver acceptance and bearing fallback).  Default: 0.005°, roughly
    /// 500 m.
    pub proximity_threshold: f64,

    /// Displacements below this are ignored.  Default: 1e-6°.
    pub epsilon: f64,

    /// Added to every emitted bearing to match the renderer's glyph
    /// orientation.  Default: 0.
    pub bearing_offset_deg: f64,

    /// Use the feed-reported bearing when no geometric bearing is available.
    /// Default: `false` (omit the bearing instead).
    pub use_reported_bearing: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 4_000,
            snap_threshold:        0.02,
            proximity_threshold:   0.005,
            epsilon:               1e-6,
            bearing_offset_deg:    0.0,
            use_reported_bearing:  false,
        }
    }
}

impl MotionConfig {
    /// Reject configurations under which reconciliation is meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if self.animation_duration_ms == 0 {
            return Err(CoreError::Config("animation_duration_ms must be > 0".into()));
        }
        for (name, v) in [
            ("snap_threshold", self.snap_threshold),
            ("proximity_threshold", self.proximity_threshold),
            ("epsilon", self.epsilon),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CoreError::Config(format!("{name} must be finite and > 0, got {v}")));
            }
        }
        if self.epsilon >= self.snap_threshold {
            return Err(CoreError::Config(format!(
                "epsilon ({}) must be smaller than snap_threshold ({})",
                self.epsilon, self.snap_threshold
            )));
        }
        if !self.bearing_offset_deg.is_finite() {
            return Err(CoreError::Config("bearing_offset_deg must be finite".into()));
        }
        Ok(())
    }

    /// Fraction of a leg completed after `elapsed_ms`, in `[0, 1]`.
    #[inline]
    pub fn progress(&self, elapsed_ms: u64) -> f64 {
        if self.animation_duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f64 / self.animation_duration_ms as f64).min(1.0)
    }
}
