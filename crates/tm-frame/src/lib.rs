//! `tm-frame` — turns animation state into per-frame render records.
//!
//! # Frame loop
//!
//! ```text
//! every frame_interval_ms, until cancelled:
//!   ① Drain   — every batch the poller has delivered since the last frame
//!               is reconciled, in arrival order, at the frame's time.
//!   ② Sample  — each tracked entity's position and bearing are computed
//!               (parallel with the `parallel` feature).
//!   ③ Settle  — legs that reached progress 1 are finalized, in entity
//!               order, after sampling.
//!   ④ Emit    — the frame goes to the FrameSink.
//! ```
//!
//! Because draining happens before sampling on the same thread, a frame
//! never observes a half-applied batch.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                        |
//! |------------|-----------------------------------------------|
//! | `parallel` | Runs the sampling phase on Rayon's pool.      |
//! | `fx-hash`  | FxHash for the animation store's maps.        |
//! | `serde`    | `Serialize`/`Deserialize` on `RenderRecord`.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let (mut frames, batches) = FrameLoopBuilder::new(config, index).build()?;
//! std::thread::spawn(move || poll_forever(batches));
//! frames.run(&MonotonicClock::new(), &mut my_renderer);
//! ```

pub mod bearing;
pub mod builder;
pub mod clock;
pub mod error;
pub mod frame_loop;
pub mod observer;
pub mod producer;
pub mod render;

#[cfg(test)]
mod tests;

pub use bearing::derive_bearing;
pub use builder::{DEFAULT_FRAME_INTERVAL_MS, FrameLoopBuilder};
pub use clock::{CancelToken, Clock, ManualClock, MonotonicClock};
pub use error::{FrameError, FrameResult};
pub use frame_loop::FrameLoop;
pub use observer::{FrameSink, NoopSink};
pub use producer::produce_frame;
pub use render::{Frame, RenderRecord};
