//! Common test utilities shared between integration tests

#![allow(dead_code)]

use framestep::scheduler::{StepController, Tick};
use serde_json::Value;
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Result of driving a controller until its stack drains
#[derive(Debug, PartialEq)]
pub struct Run {
    /// Tick on which the last frame finished
    pub finished_at: u32,
    /// Signals paired with the tick that produced them
    pub signals: Vec<(u32, Value)>,
}

/// Update until the controller finishes, panicking after `limit` ticks
pub fn run_to_end(ctl: &mut StepController<Value>, limit: u32) -> Run {
    let mut signals = Vec::new();
    for tick in 1..=limit {
        if let Tick::Signalled { signal, .. } = ctl.update().expect("update should succeed") {
            signals.push((tick, signal));
        }
        if ctl.is_finished() {
            return Run {
                finished_at: tick,
                signals,
            };
        }
    }
    panic!("controller still running after {} ticks", limit);
}
