//! High-level motion engine: reconciles snapshot batches against the
//! animation store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use tm_core::{EntityId, Millis, MotionConfig, Snapshot, SnapshotBatch};
use tm_spatial::{RoutePathIndex, TrackResolver};

use crate::{Animation, AnimationStore, MotionResult};

/// What reconciling one snapshot did to its entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LegOutcome {
    /// First sighting; placed at the reported position.
    Placed,
    /// Moved less than epsilon, or already heading there.  No change.
    Unchanged,
    /// Moved further than the snap threshold; placed without animation.
    Teleported,
    /// New leg following route geometry.
    OnTrack,
    /// New straight-line leg.
    Straight,
}

/// Counts of what one [`MotionEngine::reconcile`] call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub placed:     usize,
    pub unchanged:  usize,
    pub teleported: usize,
    pub on_track:   usize,
    pub straight:   usize,
    /// Entities dropped because the batch no longer contained them.
    pub removed:    Vec<EntityId>,
}

impl ReconcileSummary {
    fn record(&mut self, outcome: LegOutcome) {
        match outcome {
            LegOutcome::Placed     => self.placed += 1,
            LegOutcome::Unchanged  => self.unchanged += 1,
            LegOutcome::Teleported => self.teleported += 1,
            LegOutcome::OnTrack    => self.on_track += 1,
            LegOutcome::Straight   => self.straight += 1,
        }
    }

    /// Number of new animated legs.
    pub fn animated(&self) -> usize {
        self.on_track + self.straight
    }

    /// Number of snapshots reconciled.
    pub fn snapshots(&self) -> usize {
        self.placed + self.unchanged + self.teleported + self.animated()
    }
}

/// Wraps a [`TrackResolver`] and an [`AnimationStore`] together with the
/// route geometry and thresholds they are evaluated against.
///
/// # Type parameter
///
/// `R` must implement [`TrackResolver`] (e.g.
/// [`tm_spatial::ProximityResolver`]).  Swap it at compile time for a
/// different path-matching strategy with no runtime overhead.
pub struct MotionEngine<R: TrackResolver> {
    /// The path-matching strategy.
    pub resolver: R,

    /// All per-entity animation state.
    pub store: AnimationStore,

    /// Route geometry, shared read-only.
    pub index: Arc<RoutePathIndex>,

    config: MotionConfig,
}

impl<R: TrackResolver> MotionEngine<R> {
    /// Create an engine with no tracked entities.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`](crate::MotionError::Config) if
    /// `config` fails validation.
    pub fn new(resolver: R, index: Arc<RoutePathIndex>, config: MotionConfig) -> MotionResult<Self> {
        config.validate()?;
        Ok(Self { resolver, store: AnimationStore::new(), index, config })
    }

    #[inline]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Merge one batch into the store at monotonic time `now`.
    ///
    /// Every snapshot is reconciled in batch order; afterwards, entities not
    /// present in the batch are removed.  A partial batch is never applied:
    /// the caller reconciles a whole batch before the next frame is sampled.
    pub fn reconcile(&mut self, batch: &SnapshotBatch, now: Millis) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut seen: HashSet<&EntityId> = HashSet::with_capacity(batch.len());

        for snapshot in batch.iter() {
            seen.insert(&snapshot.entity_id);
            self.store.track(snapshot);
            let outcome = self.reconcile_one(snapshot, now);
            summary.record(outcome);
        }

        summary.removed = self.store.retain(|id| seen.contains(id));
        for id in &summary.removed {
            debug!(entity = %id, "entity left the feed; removed");
        }

        info!(
            now = %now,
            snapshots = summary.snapshots(),
            placed = summary.placed,
            on_track = summary.on_track,
            straight = summary.straight,
            teleported = summary.teleported,
            unchanged = summary.unchanged,
            removed = summary.removed.len(),
            "batch reconciled"
        );
        summary
    }

    fn reconcile_one(&mut self, snapshot: &Snapshot, now: Millis) -> LegOutcome {
        let id = &snapshot.entity_id;
        let target = snapshot.position;
        let cfg = &self.config;

        if !target.is_finite() {
            debug!(entity = %id, "non-finite position; ignored");
            return LegOutcome::Unchanged;
        }

        // Same report as last time: keep the running leg, or stay settled
        // on the track rather than stepping off it to the raw point.
        if self.store.target(id).is_some_and(|t| t.distance(target) < cfg.epsilon) {
            return LegOutcome::Unchanged;
        }

        let current = match self.store.animation(id) {
            Some(anim) => anim.position_at(now, cfg),
            None => match self.store.cached_position(id) {
                Some(p) => p,
                None => {
                    self.store.place(id, target);
                    debug!(entity = %id, position = %target, "first sighting");
                    return LegOutcome::Placed;
                }
            },
        };

        let moved = current.distance(target);
        if moved < cfg.epsilon {
            return LegOutcome::Unchanged;
        }
        if moved > cfg.snap_threshold {
            self.store.place(id, target);
            debug!(entity = %id, from = %current, to = %target, moved, "teleported");
            return LegOutcome::Teleported;
        }

        let path = self.resolver.resolve(&self.index, &snapshot.route_id, current, target);
        let outcome = if path.is_some() { LegOutcome::OnTrack } else { LegOutcome::Straight };
        debug!(entity = %id, from = %current, to = %target, ?outcome, "new leg");

        self.store.begin(
            id,
            Animation {
                start:      current,
                end:        target,
                start_time: now,
                route_id:   snapshot.route_id.clone(),
                path,
            },
        );
        outcome
    }

    /// Finalize every leg whose duration has elapsed at `now`.
    pub fn finalize_finished(&mut self, now: Millis) -> Vec<EntityId> {
        self.store.finalize_finished(now, &self.config)
    }
}
