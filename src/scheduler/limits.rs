//! Scheduler limits and per-instance configuration.
//!
//! The step bound keeps a coroutine that never waits from hanging the tick
//! it runs in. The depth bound catches frames that nest without end.

use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Defaults
// =============================================================================

/// Maximum number of frame steps within a single `update()`
pub const DEFAULT_MAX_STEPS_PER_TICK: u32 = 10_000;

/// Maximum number of nested frames on one stack
pub const DEFAULT_MAX_DEPTH: usize = 1_024;

/// Duration of one external tick when the tick source does not supply a delta
pub const TICK: f32 = 1.0;

/// Longest accepted wait. Past 2^24 an `f32` countdown no longer changes
/// when one tick is subtracted.
pub const MAX_WAIT: f32 = 16_777_216.0;

/// Errors raised while loading configuration, rule tables, or scripts
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Read a file into a string, keeping the path in the error
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Per-scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Always spend an idle tick when the top frame changes
    pub force_delayed_swap: bool,
    pub max_steps_per_tick: u32,
    pub max_depth: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            force_delayed_swap: false,
            max_steps_per_tick: DEFAULT_MAX_STEPS_PER_TICK,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SchedulerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::Invalid("max_steps_per_tick must be at least 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
