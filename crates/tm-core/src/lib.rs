//! `tm-core` — foundational types for the `transit_motion` animation engine.
//!
//! This crate is a dependency of every other `tm-*` crate.  It has no `tm-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `RouteId`, `StopId`                           |
//! | [`geo`]         | `Coord`, planar distance, bearing, ease-out curve         |
//! | [`time`]        | `Millis` monotonic timestamp                              |
//! | [`status`]      | `VehicleStatus` and its upstream code mapping             |
//! | [`direction`]   | `DirectionHint` derived from stop-id suffixes             |
//! | [`snapshot`]    | `Snapshot`, `SnapshotBatch` — the poller's output         |
//! | [`config`]      | `MotionConfig` thresholds and durations                   |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod direction;
pub mod error;
pub mod geo;
pub mod ids;
pub mod snapshot;
pub mod status;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::MotionConfig;
pub use direction::DirectionHint;
pub use error::{CoreError, CoreResult};
pub use geo::{Coord, bearing_deg, ease_out_cubic, normalize_bearing};
pub use ids::{EntityId, RouteId, StopId};
pub use snapshot::{Snapshot, SnapshotBatch};
pub use status::VehicleStatus;
pub use time::Millis;
