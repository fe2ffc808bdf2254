//! Per-frame sampling and settlement.

use tm_core::{EntityId, Millis, MotionConfig, normalize_bearing};
use tm_motion::{AnimationStore, MotionEngine, TrackedEntity};
use tm_spatial::{RoutePathIndex, TrackResolver};

use crate::{RenderRecord, derive_bearing};

/// Sample every tracked entity at `now`, then finalize the legs that have
/// completed.
///
/// Records come out in ascending entity-id order.  An entity whose leg
/// finishes this frame is drawn where the leg comes to rest (its target,
/// or the target's projection onto the track) and is no longer marked
/// `animating`.
pub fn produce_frame<R: TrackResolver>(engine: &mut MotionEngine<R>, now: Millis) -> Vec<RenderRecord> {
    let sampled = sample_all(&engine.store, &engine.index, engine.config(), now);

    // Settle sequentially, in entity order, after the read-only phase.
    let mut records = Vec::with_capacity(sampled.len());
    for (record, finished) in sampled {
        if finished {
            engine.store.finalize(&record.entity_id);
        }
        records.push(record);
    }
    records
}

/// Read-only sampling phase.  Returns each record with a "leg finished"
/// flag.
fn sample_all(
    store:  &AnimationStore,
    index:  &RoutePathIndex,
    config: &MotionConfig,
    now:    Millis,
) -> Vec<(RenderRecord, bool)> {
    #[cfg(not(feature = "parallel"))]
    {
        store
            .tracked
            .iter()
            .filter_map(|(id, entity)| sample_one(store, index, config, id, entity, now))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        // `collect` on a BTreeMap's parallel iterator preserves key order.
        store
            .tracked
            .par_iter()
            .filter_map(|(id, entity)| sample_one(store, index, config, id, entity, now))
            .collect()
    }
}

fn sample_one(
    store:  &AnimationStore,
    index:  &RoutePathIndex,
    config: &MotionConfig,
    id:     &EntityId,
    entity: &TrackedEntity,
    now:    Millis,
) -> Option<(RenderRecord, bool)> {
    let animation = store.animation(id);
    let position = match animation {
        Some(anim) => anim.position_at(now, config),
        None => store.cached_position(id)?,
    };
    let finished = animation.is_some_and(|a| a.is_finished(now, config));

    let bearing = derive_bearing(index, config, entity, position, animation, now)
        .map(|b| normalize_bearing(b + config.bearing_offset_deg));

    let record = RenderRecord {
        entity_id: id.clone(),
        route_id:  entity.route_id.clone(),
        status:    entity.status,
        position,
        bearing,
        direction: entity.direction,
        animating: animation.is_some() && !finished,
    };
    Some((record, finished))
}
