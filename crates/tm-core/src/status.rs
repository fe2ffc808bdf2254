//! Vehicle stop status reported by the feed.

use std::str::FromStr;

use crate::CoreError;

/// Where a vehicle is relative to its current stop.
///
/// Mirrors GTFS-realtime `VehicleStopStatus`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleStatus {
    /// About to arrive at the stop.
    Incoming,
    /// Standing at the stop.
    Stopped,
    /// Departed the previous stop and moving.  The upstream default.
    #[default]
    InTransit,
}

impl VehicleStatus {
    /// Map a GTFS-realtime numeric code.  Unknown codes fall back to
    /// `InTransit`, as the protobuf default does.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => VehicleStatus::Incoming,
            1 => VehicleStatus::Stopped,
            _ => VehicleStatus::InTransit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Incoming  => "INCOMING",
            VehicleStatus::Stopped   => "STOPPED",
            VehicleStatus::InTransit => "IN_TRANSIT",
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = CoreError;

    /// Accepts the short names, the GTFS-realtime enum names, and numeric
    /// codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INCOMING" | "INCOMING_AT"     => Ok(VehicleStatus::Incoming),
            "STOPPED" | "STOPPED_AT"       => Ok(VehicleStatus::Stopped),
            "IN_TRANSIT" | "IN_TRANSIT_TO" => Ok(VehicleStatus::InTransit),
            other => other
                .parse::<i32>()
                .map(VehicleStatus::from_code)
                .map_err(|_| CoreError::Parse(format!("invalid vehicle status {other:?}"))),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
