//! The `AnimationStore` — tracked entities, live animations and the
//! last-known-position cache.

use std::collections::BTreeMap;

use tm_core::{Coord, DirectionHint, EntityId, Millis, MotionConfig, RouteId, Snapshot, VehicleStatus};

use crate::Animation;

/// Entity-keyed hash map; FxHash with the `fx-hash` feature.
#[cfg(feature = "fx-hash")]
pub type EntityMap<V> = rustc_hash::FxHashMap<EntityId, V>;

/// Entity-keyed hash map; FxHash with the `fx-hash` feature.
#[cfg(not(feature = "fx-hash"))]
pub type EntityMap<V> = std::collections::HashMap<EntityId, V>;

/// Metadata from an entity's most recent snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedEntity {
    pub route_id:         RouteId,
    pub status:           VehicleStatus,
    pub direction:        Option<DirectionHint>,
    pub reported_bearing: Option<f64>,
}

impl TrackedEntity {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            route_id:         snapshot.route_id.clone(),
            status:           snapshot.status,
            direction:        snapshot.direction(),
            reported_bearing: snapshot.bearing.filter(|b| b.is_finite()),
        }
    }
}

/// Per-entity state, owned exclusively by the engine that reconciles it.
///
/// `tracked` is ordered so frames list entities deterministically.
/// `animations` is sparse: only entities mid-leg have an entry.  Every
/// tracked entity has a cached position or an animation (usually both).
#[derive(Default)]
pub struct AnimationStore {
    /// Entities seen in the most recent batch.
    pub tracked: BTreeMap<EntityId, TrackedEntity>,

    /// In-flight legs.
    pub animations: EntityMap<Animation>,

    /// Last settled position, used when no animation is live.
    pub positions: EntityMap<Coord>,

    /// Last reported position each entity was sent towards.
    pub targets: EntityMap<Coord>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.tracked.contains_key(id)
    }

    #[inline]
    pub fn animation(&self, id: &EntityId) -> Option<&Animation> {
        self.animations.get(id)
    }

    #[inline]
    pub fn cached_position(&self, id: &EntityId) -> Option<Coord> {
        self.positions.get(id).copied()
    }

    /// The reported position `id` was last placed at or sent towards.
    #[inline]
    pub fn target(&self, id: &EntityId) -> Option<Coord> {
        self.targets.get(id).copied()
    }

    pub fn animating_count(&self) -> usize {
        self.animations.len()
    }

    /// Where `id` is drawn at `now`: sampled from its live animation, else
    /// the cached position.
    pub fn current_position(&self, id: &EntityId, now: Millis, config: &MotionConfig) -> Option<Coord> {
        match self.animations.get(id) {
            Some(anim) => Some(anim.position_at(now, config)),
            None => self.cached_position(id),
        }
    }

    /// Record the latest metadata for a snapshot's entity.
    pub fn track(&mut self, snapshot: &Snapshot) {
        self.tracked
            .insert(snapshot.entity_id.clone(), TrackedEntity::from_snapshot(snapshot));
    }

    /// Place `id` at `position` with no animation.
    pub fn place(&mut self, id: &EntityId, position: Coord) {
        self.animations.remove(id);
        self.positions.insert(id.clone(), position);
        self.targets.insert(id.clone(), position);
    }

    /// Begin a new leg for `id`, replacing any in-flight one.
    pub fn begin(&mut self, id: &EntityId, animation: Animation) {
        self.positions.insert(id.clone(), animation.start);
        self.targets.insert(id.clone(), animation.end);
        self.animations.insert(id.clone(), animation);
    }

    /// Complete `id`'s leg: cache where it came to rest and drop the record.
    ///
    /// Returns the settled position, or `None` if nothing was animating.
    pub fn finalize(&mut self, id: &EntityId) -> Option<Coord> {
        let anim = self.animations.remove(id)?;
        let settled = anim.settled_position();
        self.positions.insert(id.clone(), settled);
        Some(settled)
    }

    /// Finalize every animation whose duration has elapsed at `now`.
    pub fn finalize_finished(&mut self, now: Millis, config: &MotionConfig) -> Vec<EntityId> {
        // Collect first (immutable scan) then mutate.
        let finished: Vec<EntityId> = self
            .animations
            .iter()
            .filter(|(_, a)| a.is_finished(now, config))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &finished {
            self.finalize(id);
        }
        finished
    }

    /// Forget `id` entirely.  Returns `true` if it was tracked.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        self.animations.remove(id);
        self.positions.remove(id);
        self.targets.remove(id);
        self.tracked.remove(id).is_some()
    }

    /// Drop every entity for which `keep` returns `false`, returning the
    /// removed ids in order.
    pub fn retain<F: FnMut(&EntityId) -> bool>(&mut self, mut keep: F) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self.tracked.keys().filter(|id| !keep(id)).cloned().collect();
        for id in &removed {
            self.remove(id);
        }
        removed
    }
}
