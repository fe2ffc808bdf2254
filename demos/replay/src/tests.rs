//! Tests for the replay binary's argument parsing and offline stepping.

use std::sync::Arc;

use clap::Parser;

use tm_core::{Millis, MotionConfig};
use tm_feed::Replay;
use tm_frame::{FrameLoopBuilder, NoopSink};

use crate::synth::{SynthParams, synthesize};
use crate::{Args, FRAME_INTERVAL_MS, network, run_offline};

#[cfg(test)]
mod args {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["replay"]).unwrap();
        assert!(args.log.is_none() && args.geojson.is_none() && args.config.is_none());
        assert_eq!(args.out, std::path::PathBuf::from("output/replay"));
        assert_eq!(args.stride, 30);
        assert!(!args.realtime);
    }

    #[test]
    fn value_flags() {
        let args = Args::try_parse_from([
            "replay", "--log", "snaps.csv", "--out", "tmp/out", "--stride", "5", "--realtime",
        ])
        .unwrap();
        assert_eq!(args.log.as_deref(), Some(std::path::Path::new("snaps.csv")));
        assert_eq!(args.out, std::path::PathBuf::from("tmp/out"));
        assert_eq!(args.stride, 5);
        assert!(args.realtime);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Args::try_parse_from(["replay", "--stride", "many"]).is_err());
        assert!(Args::try_parse_from(["replay", "--bogus"]).is_err());
        assert!(Args::try_parse_from(["replay", "--log"]).is_err());
    }
}

#[cfg(test)]
mod offline {
    use super::*;

    #[test]
    fn returns_the_time_of_the_last_frame() {
        let index = Arc::new(network::build_index().unwrap());
        let batches = synthesize(&index, &SynthParams {
            seed:          7,
            polls:         3,
            poll_ms:       5_000,
            vehicles:      2,
            step:          0.0012,
            jitter:        0.00001,
            glitch_chance: 0.0,
        });
        let last_poll = batches.last().unwrap().poll;

        let (mut frames, tx) = FrameLoopBuilder::new(MotionConfig::default(), Arc::clone(&index))
            .frame_interval_ms(FRAME_INTERVAL_MS)
            .build()
            .unwrap();
        let mut replay = Replay::new(batches);
        let final_time = run_offline(&mut frames, &mut replay, &tx, &mut NoopSink).unwrap();

        // First frame is at zero, so N frames end at (N - 1) intervals.
        assert_eq!(final_time, Millis((frames.frames() - 1) * FRAME_INTERVAL_MS));
        assert!(final_time >= last_poll);
        assert!(replay.is_empty());
        assert_eq!(frames.engine.store.animating_count(), 0);
    }
}
