//! replay — drive the transit_motion engine from a recorded or synthetic
//! snapshot feed and write the resulting frames to CSV.
//!
//! ```text
//! replay [--log snapshots.csv] [--geojson routes.geojson] [--config motion.json]
//!        [--out output/replay] [--stride N] [--realtime]
//! ```
//!
//! Without `--log`, a deterministic synthetic fleet is generated on the
//! embedded route geometry.  By default time runs on a manual clock, so a
//! ten-minute feed replays in well under a second; `--realtime` paces
//! frames against the wall clock with the poller on its own thread.

mod network;
mod synth;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tm_core::{Millis, MotionConfig, SnapshotBatch};
use tm_feed::{PolledBatch, Replay, load_batches_csv};
use tm_frame::{Clock, FrameLoop, FrameLoopBuilder, FrameSink, ManualClock, MonotonicClock};
use tm_output::{CsvWriter, FrameOutputSink};
use tm_spatial::{DEFAULT_ROUTE_PROPERTY, ProximityResolver, RoutePathIndex, load_geojson_path};

use synth::{SynthParams, synthesize};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:              u64 = 42;
const POLL_MS:           u64 = 5_000;
const POLLS:             u64 = 120; // ten minutes of feed
const VEHICLES:          usize = 6;
const FRAME_INTERVAL_MS: u64 = 16;

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "replay", version, about = "Replay a vehicle snapshot feed through the transit_motion frame loop")]
struct Args {
    /// Recorded snapshot log (CSV); a synthetic fleet is generated if omitted
    #[arg(long)]
    log: Option<PathBuf>,

    /// Route geometry (GeoJSON); the embedded network is used if omitted
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Motion config (JSON); defaults if omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for frames.csv and reconciles.csv
    #[arg(long, default_value = "output/replay")]
    out: PathBuf,

    /// Write every Nth frame
    #[arg(long, default_value_t = 30)]
    stride: u64,

    /// Pace frames against the wall clock with a poller thread
    #[arg(long)]
    realtime: bool,
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<MotionConfig> {
    let Some(path) = path else {
        return Ok(MotionConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: MotionConfig = serde_json::from_str(&text).context("parsing motion config")?;
    config.validate()?;
    Ok(config)
}

/// Route geometry.  A file that fails to load degrades to an empty index:
/// every vehicle then animates in straight lines.
fn load_index(path: Option<&Path>) -> Result<RoutePathIndex> {
    match path {
        None => network::build_index(),
        Some(p) => match load_geojson_path(p, DEFAULT_ROUTE_PROPERTY) {
            Ok(index) => Ok(index),
            Err(e) => {
                warn!(path = %p.display(), error = %e, "route geometry unavailable; using straight lines");
                Ok(RoutePathIndex::empty())
            }
        },
    }
}

fn load_feed(path: Option<&Path>, index: &RoutePathIndex) -> Result<Vec<PolledBatch>> {
    match path {
        Some(p) => Ok(load_batches_csv(p).with_context(|| format!("reading {}", p.display()))?),
        None => Ok(synthesize(index, &SynthParams {
            seed:          SEED,
            polls:         POLLS,
            poll_ms:       POLL_MS,
            vehicles:      VEHICLES,
            step:          0.0012,
            jitter:        0.00003,
            glitch_chance: 0.01,
        })),
    }
}

// ── Sink wrapper to count rows ────────────────────────────────────────────────

struct CountingSink<S: FrameSink> {
    inner:      S,
    frames:     u64,
    records:    u64,
    teleports:  u64,
    reconciles: u64,
}

impl<S: FrameSink> CountingSink<S> {
    fn new(inner: S) -> Self {
        Self { inner, frames: 0, records: 0, teleports: 0, reconciles: 0 }
    }
}

impl<S: FrameSink> FrameSink for CountingSink<S> {
    fn on_reconcile(&mut self, now: Millis, summary: &tm_motion::ReconcileSummary) {
        self.reconciles += 1;
        self.teleports += summary.teleported as u64;
        self.inner.on_reconcile(now, summary);
    }

    fn on_frame(&mut self, frame: &tm_frame::Frame) {
        self.frames += 1;
        self.records += frame.len() as u64;
        self.inner.on_frame(frame);
    }

    fn on_stop(&mut self, now: Millis, frames: u64) {
        self.inner.on_stop(now, frames);
    }
}

// ── Offline stepping ──────────────────────────────────────────────────────────

/// Step the loop on a manual clock, handing batches over exactly when the
/// clock reaches their poll time.  Returns the time of the last frame.
fn run_offline<S: FrameSink>(
    frames: &mut FrameLoop<ProximityResolver>,
    replay: &mut Replay,
    tx:     &Sender<SnapshotBatch>,
    sink:   &mut S,
) -> Result<Millis> {
    let clock = ManualClock::new(Millis::ZERO);
    loop {
        let now = clock.now();
        for batch in replay.due(now) {
            tx.send(batch)?;
        }
        frames.step(now, sink);

        if replay.is_empty() && frames.engine.store.animating_count() == 0 {
            sink.on_stop(now, frames.frames());
            return Ok(now);
        }
        clock.advance(FRAME_INTERVAL_MS);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    println!("=== replay — transit_motion ===");

    // 1. Inputs.
    let config = load_config(args.config.as_deref())?;
    let index = Arc::new(load_index(args.geojson.as_deref())?);
    let batches = load_feed(args.log.as_deref(), &index)?;
    println!(
        "Routes: {}  |  polylines: {}  |  polls: {}",
        index.route_count(),
        index.polyline_count(),
        batches.len()
    );

    // 2. Frame loop.
    let (mut frames, tx) = FrameLoopBuilder::new(config, Arc::clone(&index))
        .frame_interval_ms(FRAME_INTERVAL_MS)
        .build()?;

    // 3. Output.
    std::fs::create_dir_all(&args.out)?;
    let writer = CsvWriter::new(&args.out)?;
    let mut sink = CountingSink::new(FrameOutputSink::new(writer, args.stride));

    // 4. Run.
    let t0 = Instant::now();
    let mut replay = Replay::new(batches);
    let final_time = if args.realtime {
        let clock = Arc::new(MonotonicClock::new());
        let poller_clock = Arc::clone(&clock);
        let poller = std::thread::spawn(move || {
            while let Some(next) = replay.next_poll() {
                poller_clock.sleep_until(next);
                for batch in replay.due(poller_clock.now()) {
                    if tx.send(batch).is_err() {
                        return;
                    }
                }
            }
            // Dropping `tx` lets the frame loop finish once motion settles.
        });
        frames.run(clock.as_ref(), &mut sink);
        if poller.join().is_err() {
            bail!("poller thread panicked");
        }
        clock.now()
    } else {
        run_offline(&mut frames, &mut replay, &tx, &mut sink)?
    };
    let elapsed = t0.elapsed();

    if let Some(e) = sink.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    info!(frames = sink.frames, elapsed_ms = elapsed.as_millis() as u64, "replay finished");
    println!("Replay complete in {:.3} s", elapsed.as_secs_f64());
    println!("  frames produced  : {}", sink.frames);
    println!("  render records   : {}", sink.records);
    println!("  batches / teleports : {} / {}", sink.reconciles, sink.teleports);
    println!("  output           : {}", args.out.display());
    println!();

    // 6. Final positions table.
    println!("{:<10} {:<6} {:<11} {:>11} {:>10}", "Entity", "Route", "Status", "Lon", "Lat");
    println!("{}", "-".repeat(52));
    for (id, entity) in &frames.engine.store.tracked {
        let Some(p) = frames.engine.store.current_position(id, final_time, frames.engine.config()) else {
            continue;
        };
        println!(
            "{:<10} {:<6} {:<11} {:>11.5} {:>10.5}",
            id.as_str(),
            entity.route_id.as_str(),
            entity.status.as_str(),
            p.lon,
            p.lat,
        );
    }

    Ok(())
}
