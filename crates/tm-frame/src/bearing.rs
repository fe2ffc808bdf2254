//! Marker orientation policy.
//!
//! In order of preference:
//!
//! 1. **Live path.**  The track tangent under the animation, oriented by the
//!    direction hint, or by the observed travel direction when there is no
//!    hint.
//! 2. **Nearest track.**  With a hint but no live path, the tangent of the
//!    closest segment of the entity's route, if within the proximity
//!    threshold.
//! 3. **Reported.**  The feed's own bearing, only when
//!    `use_reported_bearing` is set.
//!
//! Otherwise no bearing.  The rendering offset is not applied here.

use tm_core::{Coord, Millis, MotionConfig, normalize_bearing};
use tm_motion::{Animation, TrackedEntity};
use tm_spatial::RoutePathIndex;

/// Bearing for `entity` drawn at `position` at `now`, before the rendering
/// offset.
pub fn derive_bearing(
    index:     &RoutePathIndex,
    config:    &MotionConfig,
    entity:    &TrackedEntity,
    position:  Coord,
    animation: Option<&Animation>,
    now:       Millis,
) -> Option<f64> {
    let on_path = animation.and_then(|anim| {
        let path = anim.path.as_ref()?;
        let tangent = path.tangent_at(anim.eased(now, config))?;
        let reversed = match entity.direction {
            Some(hint) => hint.is_reversed(),
            None => path.is_backward(),
        };
        Some(orient(tangent, reversed))
    });
    if on_path.is_some() {
        return on_path;
    }

    let near_track = entity.direction.and_then(|hint| {
        let hit = index.nearest_segment(&entity.route_id, position, config.proximity_threshold)?;
        let tangent = hit.polyline.tangent_bearing(&hit.projection)?;
        Some(orient(tangent, hint.is_reversed()))
    });
    if near_track.is_some() {
        return near_track;
    }

    if config.use_reported_bearing {
        return entity.reported_bearing.map(normalize_bearing);
    }
    None
}

#[inline]
fn orient(tangent: f64, reversed: bool) -> f64 {
    if reversed { normalize_bearing(tangent + 180.0) } else { tangent }
}
