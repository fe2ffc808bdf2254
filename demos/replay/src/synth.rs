//! Synthetic poller: vehicles that shuttle end to end along a route
//! polyline, reported every poll with GPS jitter and the occasional glitch.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tm_core::{Coord, EntityId, Millis, RouteId, Snapshot, SnapshotBatch, StopId, VehicleStatus};
use tm_feed::PolledBatch;
use tm_spatial::{Polyline, RoutePathIndex};

/// Tunables for [`synthesize`].
pub struct SynthParams {
    pub seed:          u64,
    pub polls:         u64,
    pub poll_ms:       u64,
    pub vehicles:      usize,
    /// Track distance covered per poll, in degrees.
    pub step:          f64,
    /// Half-width of uniform position noise.
    pub jitter:        f64,
    /// Probability that a report is wildly off (exercises teleporting).
    pub glitch_chance: f64,
}

struct Vehicle {
    id:       EntityId,
    route:    RouteId,
    polyline: Arc<Polyline>,
    measure:  f64,
    forward:  bool,
    dwell:    u32,
    /// Poll after which the vehicle leaves the feed.
    retires:  Option<u64>,
}

/// Generate `params.polls` batches for vehicles spread over every route in
/// `index`.  Deterministic for a given seed.
pub fn synthesize(index: &RoutePathIndex, params: &SynthParams) -> Vec<PolledBatch> {
    let mut rng = SmallRng::seed_from_u64(params.seed);

    let mut routes: Vec<&RouteId> = index.route_ids().collect();
    routes.sort();

    let mut fleet: Vec<Vehicle> = (0..params.vehicles)
        .filter_map(|i| {
            let route = routes.get(i % routes.len().max(1))?;
            let paths = index.paths_for(route);
            let polyline = paths.get(i % paths.len().max(1))?;
            Some(Vehicle {
                id:       EntityId::new(format!("{route}-{i:03}")),
                route:    (*route).clone(),
                polyline: Arc::clone(polyline),
                measure:  rng.gen_range(0.0..=polyline.length()),
                forward:  rng.gen_bool(0.5),
                dwell:    0,
                // The last vehicle drops out halfway through.
                retires:  (i + 1 == params.vehicles).then_some(params.polls / 2),
            })
        })
        .collect();

    (0..params.polls)
        .map(|poll| {
            let snapshots = fleet
                .iter_mut()
                .filter(|v| v.retires.is_none_or(|r| poll < r))
                .map(|v| v.report(&mut rng, params, poll))
                .collect::<SnapshotBatch>();
            PolledBatch { poll: Millis(poll * params.poll_ms), batch: snapshots }
        })
        .collect()
}

impl Vehicle {
    fn report(&mut self, rng: &mut SmallRng, params: &SynthParams, poll: u64) -> Snapshot {
        let status = self.advance(params.step);

        let mut position = self.polyline.point_at_measure(self.measure);
        position.lon += rng.gen_range(-params.jitter..=params.jitter);
        position.lat += rng.gen_range(-params.jitter..=params.jitter);
        if rng.gen_bool(params.glitch_chance) {
            position = Coord::new(position.lon + 0.1, position.lat - 0.1);
        }

        let suffix = if self.forward { 'N' } else { 'S' };
        let stop = (self.measure / self.polyline.length() * 10.0) as u32;
        Snapshot {
            entity_id: self.id.clone(),
            route_id:  self.route.clone(),
            position,
            bearing:   None,
            status,
            stop_id:   Some(StopId::new(format!("{}{stop:02}{suffix}", self.route))),
            timestamp: 1_718_000_000 + (poll * params.poll_ms / 1_000) as i64,
        }
    }

    /// Move one poll's worth along the track, turning around at the ends.
    fn advance(&mut self, step: f64) -> VehicleStatus {
        if self.dwell > 0 {
            self.dwell -= 1;
            return VehicleStatus::Stopped;
        }

        let len = self.polyline.length();
        let next = if self.forward { self.measure + step } else { self.measure - step };
        if next <= 0.0 || next >= len {
            self.measure = next.clamp(0.0, len);
            self.forward = !self.forward;
            self.dwell = 2;
            return VehicleStatus::Incoming;
        }
        self.measure = next;
        VehicleStatus::InTransit
    }
}
