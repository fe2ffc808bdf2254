//! Travel-direction hint carried by stop ids.
//!
//! Many rapid-transit feeds suffix platform ids with the direction of travel
//! (`A32N`, `A32S`).  This is a best-effort signal: nothing checks it against
//! route topology, and branching routes may draw polylines in either order.

use crate::StopId;

/// Which way along a route's polylines a vehicle is heading.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectionHint {
    /// Same order as the polyline vertices.
    North,
    /// Opposite to the polyline vertex order.
    South,
}

impl DirectionHint {
    /// Read the trailing character of `stop`: `N`/`S` map to a hint, anything
    /// else gives `None`.
    pub fn from_stop_id(stop: &StopId) -> Option<Self> {
        match stop.as_str().chars().last()? {
            'N' => Some(DirectionHint::North),
            'S' => Some(DirectionHint::South),
            _ => None,
        }
    }

    /// `true` when travel runs against the polyline vertex order.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, DirectionHint::South)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectionHint::North => "N",
            DirectionHint::South => "S",
        }
    }
}

impl std::fmt::Display for DirectionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
