//! `tm-feed` — recorded vehicle snapshot logs.
//!
//! Live feed acquisition and decoding happen outside this workspace; the
//! engine only ever sees [`SnapshotBatch`]es.  This crate replays a
//! recorded log of those batches so demos and tests can drive the engine
//! without a network poller.
//!
//! | Module     | Contents                                           |
//! |------------|----------------------------------------------------|
//! | [`loader`] | CSV log → ordered `PolledBatch`es                  |
//! | [`replay`] | `Replay` — hands out batches as their poll time passes |
//! | [`error`]  | `FeedError`, `FeedResult`                          |
//!
//! [`SnapshotBatch`]: tm_core::SnapshotBatch

pub mod error;
pub mod loader;
pub mod replay;

#[cfg(test)]
mod tests;

pub use error::{FeedError, FeedResult};
pub use loader::{PolledBatch, load_batches_csv, load_batches_reader};
pub use replay::Replay;
