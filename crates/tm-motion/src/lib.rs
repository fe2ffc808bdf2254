//! `tm-motion` — per-entity animation state and snapshot reconciliation.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`state`]  | `Animation` — one in-flight leg, and how to sample it           |
//! | [`store`]  | `AnimationStore` — tracked entities, animations, position cache |
//! | [`engine`] | `MotionEngine<R>` — reconciliation of snapshot batches          |
//! | [`error`]  | `MotionError`, `MotionResult<T>`                                |
//!
//! # Motion model (re-anchored legs)
//!
//! Every snapshot batch is reconciled against what is *currently drawn*:
//!
//! 1. The entity's displayed position at reconcile time is sampled from its
//!    live animation (or read from the position cache).
//! 2. A new leg runs from that displayed position to the reported one, so a
//!    vehicle never jumps back to where the previous leg started.
//! 3. Legs longer than the snap threshold are not animated; the entity is
//!    moved instantly.
//! 4. Legs are constrained to route geometry when a
//!    [`TrackResolver`][tm_spatial::TrackResolver] finds a plausible
//!    polyline, and fall back to a straight line otherwise.
//!
//! There is no queueing: a new batch always replaces the in-flight leg.

pub mod engine;
pub mod error;
pub mod state;
pub mod store;


pub use engine::{LegOutcome, MotionEngine, ReconcileSummary};
pub use error::{MotionError, MotionResult};
pub use state::Animation;
pub use store::{AnimationStore, EntityMap, TrackedEntity};
