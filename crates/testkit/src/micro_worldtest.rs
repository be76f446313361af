//! Micro-worldtest harness for deterministic, tick-based tests.
//!
//! A micro-worldtest is intentionally small: it steps a tiny simulation for a
//! fixed number of ticks and snapshots selected state each tick. The frames are
//! returned so tests can assert invariants on every tick. When a golden path
//! is configured the report is also compared against it (or updated when
//! `TILECRAFT_UPDATE_SNAPSHOTS=1` is set).

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tilecraft_core::SimTick;

/// Configuration for a micro-worldtest.
#[derive(Debug, Clone)]
pub struct MicroWorldtestConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Number of ticks to step (report includes the initial snapshot at tick 0).
    pub ticks: u64,
    /// Optional golden JSON file.
    pub snapshot_path: Option<PathBuf>,
}

impl MicroWorldtestConfig {
    /// Config without a golden file.
    pub fn new(name: impl Into<String>, ticks: u64) -> Self {
        Self {
            name: name.into(),
            ticks,
            snapshot_path: None,
        }
    }
}

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Every frame of a finished micro-worldtest.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestReport<S> {
    /// Name from the config.
    pub name: String,
    /// `ticks + 1` frames, starting at tick 0.
    pub frames: Vec<MicroWorldtestFrame<S>>,
}

impl<S> MicroWorldtestReport<S> {
    /// Snapshot after the last step.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }
}

/// Run a micro-worldtest and return its frames.
///
/// Captures the initial snapshot at tick 0, then steps `config.ticks` times,
/// capturing a snapshot after each step (so the report contains `ticks + 1` frames).
pub fn run_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: MicroWorldtestConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Result<MicroWorldtestReport<Snapshot>>
where
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(MicroWorldtestFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(MicroWorldtestFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    let report = MicroWorldtestReport {
        name: config.name,
        frames,
    };
    if let Some(path) = config.snapshot_path {
        assert_json_snapshot(path, &report)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_produces_one_frame_per_tick_plus_initial() {
        let report = run_micro_worldtest(
            MicroWorldtestConfig::new("counter", 5),
            0u32,
            |_, n| *n += 2,
            |tick, n| (tick.0, *n),
        )
        .unwrap();
        assert_eq!(report.frames.len(), 6);
        assert_eq!(report.frames[0].snapshot, (0, 0));
        assert_eq!(report.last(), Some(&(5, 10)));
    }
}
