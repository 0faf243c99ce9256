//! Telemetry: bounded in-memory event ledger with JSONL dump, debug cadence
//! settings, and the per-tick stage recorder used for schedule digests.

use anyhow::{Context, Result};
use axledyn_core::{schedule_digest, StepStage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub struct ScheduleRecorder {
    stages: Vec<StepStage>,
}

impl Default for ScheduleRecorder {
    fn default() -> Self { Self::new() }
}

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn stages(&self) -> &[StepStage] { &self.stages }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/// Debug output cadence. Zero disables a channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebugSettings {
    pub print_every: u32,
    pub json_every: u32,
}

/// One telemetry record. Serialized as externally-tagged JSON, one object
/// per line in the dump files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LedgerEvent {
    Contact { wheel: usize, fz: f32, compression: f32 },
    TireSolve { wheel: usize, fx: f32, fy: f32, slip_ratio: f32, slip_angle: f32 },
    GearChange { from: i8, to: i8 },
    EngineSample { rpm: f32, gear: i8 },
    SteerTorque { nm: f32 },
    Collision { impulse: f32, point: [f32; 3] },
}

/// Bounded event buffer. Push beyond capacity silently drops the event;
/// telemetry must never grow without bound inside the tick loop.
pub struct Ledger {
    events: Vec<LedgerEvent>,
    cap: usize,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self { events: Vec::with_capacity(cap.min(1024)), cap }
    }

    pub fn push(&mut self, e: LedgerEvent) {
        if self.events.len() < self.cap {
            self.events.push(e);
        }
    }

    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) { self.events.clear(); }

    /// Dump the buffered events to `<dir>/ledger_<tick>.jsonl` and clear the
    /// buffer. Creates the directory if needed.
    pub fn write_jsonl(&mut self, dir: impl AsRef<Path>, tick: u64) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create telemetry dir: {}", dir.display()))?;
        let path = dir.join(format!("ledger_{tick}.jsonl"));
        let mut out = String::new();
        for e in &self.events {
            out.push_str(&serde_json::to_string(e)?);
            out.push('\n');
        }
        std::fs::write(&path, out)
            .with_context(|| format!("failed to write ledger: {}", path.display()))?;
        self.events.clear();
        Ok(path)
    }
}
