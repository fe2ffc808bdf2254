//! Unit tests for tm-frame.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use tm_core::{
    Coord, DirectionHint, EntityId, Millis, MotionConfig, RouteId, Snapshot, SnapshotBatch, StopId,
    VehicleStatus,
};
use tm_motion::ReconcileSummary;
use tm_spatial::{Polyline, ProximityResolver, RoutePathIndex, RoutePathIndexBuilder};

use crate::{CancelToken, Clock, Frame, FrameLoop, FrameLoopBuilder, FrameSink, ManualClock, NoopSink};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Staircase for route "L": east, north, east, 0.001° each.
///
/// ```text
///            v2 ── v3
///            │
///   v0 ──── v1
/// ```
const V: [Coord; 4] = [
    Coord::new(-73.990, 40.750),
    Coord::new(-73.989, 40.750),
    Coord::new(-73.989, 40.751),
    Coord::new(-73.988, 40.751),
];

fn stair_index() -> RoutePathIndex {
    let mut b = RoutePathIndexBuilder::new();
    b.add_polyline(RouteId::from("L"), Polyline::new(V.to_vec()).unwrap());
    b.build()
}

fn frame_loop(config: MotionConfig) -> (FrameLoop<ProximityResolver>, Sender<SnapshotBatch>) {
    FrameLoopBuilder::new(config, stair_index()).build().unwrap()
}

fn snap(id: &str, route: &str, at: Coord) -> Snapshot {
    Snapshot {
        entity_id: EntityId::from(id),
        route_id:  RouteId::from(route),
        position:  at,
        bearing:   None,
        status:    VehicleStatus::InTransit,
        stop_id:   None,
        timestamp: 0,
    }
}

fn with_stop(mut s: Snapshot, stop: &str) -> Snapshot {
    s.stop_id = Some(StopId::from(stop));
    s
}

fn send(tx: &Sender<SnapshotBatch>, snaps: Vec<Snapshot>) {
    tx.send(SnapshotBatch::new(snaps)).unwrap();
}

fn x() -> EntityId {
    EntityId::from("X")
}

/// Bearing equality modulo 360.
fn same_bearing(a: f64, b: f64) -> bool {
    let d = (a - b).rem_euclid(360.0);
    d < 1e-9 || d > 360.0 - 1e-9
}

/// Records every callback.
#[derive(Default)]
struct Recorder {
    reconciles: Vec<(Millis, ReconcileSummary)>,
    frames:     Vec<Frame>,
    stopped:    Option<(Millis, u64)>,
}

impl FrameSink for Recorder {
    fn on_reconcile(&mut self, now: Millis, summary: &ReconcileSummary) {
        self.reconciles.push((now, summary.clone()));
    }

    fn on_frame(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn on_stop(&mut self, now: Millis, frames: u64) {
        self.stopped = Some((now, frames));
    }
}

// ── End-to-end scenario ───────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;

    #[test]
    fn mid_leg_sample_lies_on_the_north_segment() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[0])]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", V[2])]);
        lp.step(Millis(5_000), &mut NoopSink);

        let frame = lp.step(Millis(7_000), &mut NoopSink);
        let r = frame.get(&x()).unwrap();

        // Eased 0.875 of 0.002 along the path: 0.00075 up segment 1.
        assert!((r.position.lon - V[1].lon).abs() < 1e-9);
        assert!(r.position.lat > V[1].lat && r.position.lat < V[2].lat);
        assert!((r.position.lat - 40.75075).abs() < 1e-9);
        assert!(same_bearing(r.bearing.unwrap(), 0.0));
        assert!(r.animating);
    }

    #[test]
    fn leg_settles_at_target() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[0])]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", V[2])]);
        lp.step(Millis(5_000), &mut NoopSink);

        let done = lp.step(Millis(9_000), &mut NoopSink);
        let r = done.get(&x()).unwrap();
        assert!(r.position.distance(V[2]) < 1e-9);
        assert!(!r.animating);
        assert!(lp.engine.store.animation(&x()).is_none());

        // Next frame uses the cache, unchanged.
        let later = lp.step(Millis(9_016), &mut NoopSink);
        assert_eq!(later.get(&x()).unwrap().position, r.position);
    }

    #[test]
    fn off_track_target_settles_without_a_jump() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        // 0.0003 deg north of the top step.
        let reported = Coord::new(-73.9887, 40.7513);
        let on_track = Coord::new(-73.9887, 40.751);
        send(&tx, vec![snap("X", "L", V[0])]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", reported)]);
        lp.step(Millis(5_000), &mut NoopSink);

        let last_animated = lp.step(Millis(8_984), &mut NoopSink).get(&x()).unwrap().position;
        let settled = lp.step(Millis(9_000), &mut NoopSink).get(&x()).unwrap().position;
        let after = lp.step(Millis(9_016), &mut NoopSink).get(&x()).unwrap().position;

        assert!(settled.distance(on_track) < 1e-9);
        assert_eq!(after, settled);
        assert!(last_animated.distance(settled) < 1e-6);

        // The feed repeating the raw point keeps the vehicle on the track.
        send(&tx, vec![snap("X", "L", reported)]);
        let repeat = lp.step(Millis(10_000), &mut NoopSink).get(&x()).unwrap().clone();
        assert_eq!(repeat.position, settled);
        assert!(!repeat.animating);
    }

    #[test]
    fn teleport_renders_target_immediately() {
        let config = MotionConfig { snap_threshold: 0.02, ..MotionConfig::default() };
        let (mut lp, tx) = frame_loop(config);
        send(&tx, vec![snap("X", "L", Coord::new(-73.98, 40.75))]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", Coord::new(-73.50, 40.30))]);

        let frame = lp.step(Millis(5_000), &mut NoopSink);
        assert_eq!(frame.get(&x()).unwrap().position, Coord::new(-73.50, 40.30));
        assert!(lp.engine.store.animation(&x()).is_none());
    }

    #[test]
    fn removed_entity_is_absent_from_next_frame() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[0]), snap("Y", "L", V[3])]);
        assert_eq!(lp.step(Millis(0), &mut NoopSink).len(), 2);

        send(&tx, vec![snap("Y", "L", V[3])]);
        let frame = lp.step(Millis(5_000), &mut NoopSink);
        assert_eq!(frame.len(), 1);
        assert!(frame.get(&x()).is_none());
    }

    #[test]
    fn records_are_ordered_by_entity() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("c", "L", V[0]), snap("a", "L", V[1]), snap("b", "L", V[2])]);
        let frame = lp.step(Millis(0), &mut NoopSink);
        let ids: Vec<&str> = frame.records.iter().map(|r| r.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}

// ── Bearing policy ────────────────────────────────────────────────────────────

#[cfg(test)]
mod bearing {
    use super::*;

    #[test]
    fn southbound_hint_reverses_path_tangent() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![with_stop(snap("X", "L", V[0]), "L06S")]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![with_stop(snap("X", "L", V[2]), "L06S")]);
        lp.step(Millis(5_000), &mut NoopSink);

        let r = lp.step(Millis(7_000), &mut NoopSink).get(&x()).cloned().unwrap();
        assert!(same_bearing(r.bearing.unwrap(), 180.0));
        assert_eq!(r.direction, Some(DirectionHint::South));
    }

    #[test]
    fn backward_travel_without_hint_points_backwards() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[3])]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", V[1])]);
        lp.step(Millis(5_000), &mut NoopSink);

        // Eased 0.875 of 0.002 back from v3: on segment 1, heading south.
        let r = lp.step(Millis(7_000), &mut NoopSink).get(&x()).cloned().unwrap();
        assert!(same_bearing(r.bearing.unwrap(), 180.0));
    }

    #[test]
    fn stationary_entity_with_hint_uses_nearest_track() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        // Just off the first (eastbound) segment, northbound hint.
        send(&tx, vec![with_stop(snap("X", "L", Coord::new(-73.9895, 40.7501)), "L03N")]);
        let r = lp.step(Millis(0), &mut NoopSink).get(&x()).cloned().unwrap();
        assert!(same_bearing(r.bearing.unwrap(), 90.0));
    }

    #[test]
    fn no_path_and_no_hint_omits_bearing() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        let mut s = snap("X", "Q", Coord::new(-73.9, 40.7));
        s.bearing = Some(45.0);
        send(&tx, vec![s]);
        let r = lp.step(Millis(0), &mut NoopSink).get(&x()).cloned().unwrap();
        assert_eq!(r.bearing, None);
    }

    #[test]
    fn reported_bearing_when_enabled() {
        let config = MotionConfig { use_reported_bearing: true, ..MotionConfig::default() };
        let (mut lp, tx) = frame_loop(config);
        let mut s = snap("X", "Q", Coord::new(-73.9, 40.7));
        s.bearing = Some(-90.0);
        send(&tx, vec![s]);
        let r = lp.step(Millis(0), &mut NoopSink).get(&x()).cloned().unwrap();
        assert!(same_bearing(r.bearing.unwrap(), 270.0));
    }

    #[test]
    fn offset_is_applied_and_normalized() {
        let config = MotionConfig { bearing_offset_deg: -90.0, ..MotionConfig::default() };
        let (mut lp, tx) = frame_loop(config);
        send(&tx, vec![snap("X", "L", V[0])]);
        lp.step(Millis(0), &mut NoopSink);
        send(&tx, vec![snap("X", "L", V[2])]);
        lp.step(Millis(5_000), &mut NoopSink);

        let b = lp.step(Millis(7_000), &mut NoopSink).get(&x()).unwrap().bearing.unwrap();
        assert!(same_bearing(b, 270.0));
        assert!((0.0..360.0).contains(&b));
    }
}

// ── Loop, clock, builder ──────────────────────────────────────────────────────

#[cfg(test)]
mod frame_loop {
    use super::*;

    #[test]
    fn builder_rejects_zero_interval() {
        let r = FrameLoopBuilder::new(MotionConfig::default(), RoutePathIndex::empty())
            .frame_interval_ms(0)
            .build();
        assert!(r.is_err());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = MotionConfig { epsilon: 1.0, ..MotionConfig::default() };
        assert!(FrameLoopBuilder::new(config, Arc::new(RoutePathIndex::empty())).build().is_err());
    }

    #[test]
    fn manual_clock_jumps_instead_of_sleeping() {
        let c = ManualClock::new(Millis(100));
        c.sleep_until(Millis(50));
        assert_eq!(c.now(), Millis(100));
        c.sleep_until(Millis(116));
        assert_eq!(c.now(), Millis(116));
        c.advance(4);
        assert_eq!(c.now(), Millis(120));
    }

    #[test]
    fn batches_reconcile_before_sampling() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[0])]);
        send(&tx, vec![snap("X", "L", V[1])]);
        let mut rec = Recorder::default();
        let frame = lp.step(Millis(0), &mut rec);

        // Both batches applied, in order, at the frame's time.
        assert_eq!(rec.reconciles.len(), 2);
        assert_eq!(rec.reconciles[0].1.placed, 1);
        assert_eq!(rec.reconciles[1].1.on_track, 1);
        // The second leg starts at this very instant.
        assert_eq!(frame.get(&x()).unwrap().position, V[0]);
    }

    #[test]
    fn run_stops_when_feed_closes_and_motion_settles() {
        let (mut lp, tx) = frame_loop(MotionConfig::default());
        send(&tx, vec![snap("X", "L", V[0])]);
        send(&tx, vec![snap("X", "L", V[2])]);
        drop(tx);

        let clock = ManualClock::new(Millis(0));
        let mut rec = Recorder::default();
        let interval = lp.frame_interval_ms();
        let frames = lp.run(&clock, &mut rec);

        // 4000 ms leg at 16 ms per frame: frames at 0, 16, …, 4000.
        assert_eq!(frames, 4_000 / interval + 1);
        assert_eq!(rec.frames.len() as u64, frames);
        let last = rec.frames.last().unwrap().get(&x()).unwrap();
        assert!(last.position.distance(V[2]) < 1e-9);
        assert_eq!(rec.stopped, Some((Millis(4_000), frames)));
        assert!(lp.is_disconnected());
    }

    #[test]
    fn cancelled_loop_produces_no_frames() {
        let token = CancelToken::new();
        let (mut lp, _tx) = FrameLoopBuilder::new(MotionConfig::default(), stair_index())
            .cancel_token(token.clone())
            .build()
            .unwrap();
        token.cancel();
        assert!(lp.cancel_token().is_cancelled());

        let mut rec = Recorder::default();
        assert_eq!(lp.run(&ManualClock::new(Millis(0)), &mut rec), 0);
        assert!(rec.frames.is_empty());
        assert!(rec.stopped.is_some());
    }

    #[test]
    fn frame_indices_count_up() {
        let (mut lp, _tx) = frame_loop(MotionConfig::default());
        for i in 0..3 {
            assert_eq!(lp.step(Millis(i * 16), &mut NoopSink).index, i);
        }
        assert_eq!(lp.frames(), 3);
    }
}
