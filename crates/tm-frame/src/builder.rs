//! Fluent builder for constructing a [`FrameLoop`].

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};

use tm_core::{MotionConfig, SnapshotBatch};
use tm_motion::MotionEngine;
use tm_spatial::{ProximityResolver, RoutePathIndex, TrackResolver};

use crate::{CancelToken, FrameError, FrameLoop, FrameResult};

/// Default frame pacing, roughly 60 frames per second.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Fluent builder for [`FrameLoop<R>`].
///
/// # Required inputs
///
/// - [`MotionConfig`] — durations and thresholds
/// - [`RoutePathIndex`] — route geometry (may be empty)
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                          |
/// |-------------------------|--------------------------------------------------|
/// | `.resolver(r)`          | `ProximityResolver` at `config.proximity_threshold` |
/// | `.frame_interval_ms(n)` | 16                                               |
/// | `.cancel_token(t)`      | A fresh token                                    |
///
/// # Example
///
/// ```rust,ignore
/// let (mut frames, batches) = FrameLoopBuilder::new(config, index)
///     .frame_interval_ms(33)
///     .build()?;
/// ```
pub struct FrameLoopBuilder<R: TrackResolver = ProximityResolver> {
    config:            MotionConfig,
    index:             Arc<RoutePathIndex>,
    resolver:          R,
    frame_interval_ms: u64,
    cancel:            Option<CancelToken>,
}

impl FrameLoopBuilder<ProximityResolver> {
    /// Create a builder using the default proximity resolver.
    pub fn new(config: MotionConfig, index: impl Into<Arc<RoutePathIndex>>) -> Self {
        let resolver = ProximityResolver::new(config.proximity_threshold);
        Self {
            config,
            index: index.into(),
            resolver,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            cancel: None,
        }
    }
}

impl<R: TrackResolver> FrameLoopBuilder<R> {
    /// Replace the track resolver.
    pub fn resolver<R2: TrackResolver>(self, resolver: R2) -> FrameLoopBuilder<R2> {
        FrameLoopBuilder {
            config:            self.config,
            index:             self.index,
            resolver,
            frame_interval_ms: self.frame_interval_ms,
            cancel:            self.cancel,
        }
    }

    pub fn frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Share an existing cancel token, e.g. one wired to Ctrl-C.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate inputs and return the loop plus the sender the poller
    /// delivers batches through.
    pub fn build(self) -> FrameResult<(FrameLoop<R>, Sender<SnapshotBatch>)> {
        if self.frame_interval_ms == 0 {
            return Err(FrameError::Config("frame_interval_ms must be > 0".into()));
        }
        let engine = MotionEngine::new(self.resolver, self.index, self.config)?;
        let (tx, rx) = mpsc::channel();
        let frame_loop = FrameLoop::new(
            engine,
            rx,
            self.frame_interval_ms,
            self.cancel.unwrap_or_default(),
        );
        Ok((frame_loop, tx))
    }
}
