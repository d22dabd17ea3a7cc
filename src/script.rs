//! Data-driven coroutine scripts
//!
//! A script is a named list of steps loaded from JSON. Each resume of a
//! [`ScriptFrame`] executes one step; running past the last step finishes
//! the frame.
//!
//! ```text
//! { "name": "intro", "producer": "host",
//!   "steps": [ { "wait": 2 },
//!              { "call": { "name": "fade", "steps": [ { "wait": 1 } ] } },
//!              { "signal": { "event": "intro-done" } },
//!              "done" ] }
//! ```

use crate::scheduler::limits::{read_file, ConfigError};
use crate::scheduler::{CoroutineFrame, ProducerId, Yielded};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<ProducerId>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Suspend for a number of ticks
    Wait(f32),
    /// Run a nested script to completion
    Call(Rc<Script>),
    /// Hand a value to the tick source
    Signal(Value),
    /// Finish early
    Done,
}

impl ScriptStep {
    pub fn call(script: Script) -> Self {
        ScriptStep::Call(Rc::new(script))
    }
}

impl Script {
    pub fn new(name: impl Into<String>, steps: Vec<ScriptStep>) -> Self {
        Script {
            name: name.into(),
            producer: None,
            steps,
        }
    }

    pub fn with_producer(mut self, producer: impl Into<ProducerId>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    /// Instantiate a frame that runs this script from the start
    ///
    /// Only the top level is copied; called scripts are shared.
    pub fn frame(&self) -> ScriptFrame {
        ScriptFrame::new(Rc::new(self.clone()))
    }
}

/// Frame executing a [`Script`]
pub struct ScriptFrame {
    script: Rc<Script>,
    cursor: usize,
}

impl ScriptFrame {
    pub fn new(script: Rc<Script>) -> Self {
        ScriptFrame { script, cursor: 0 }
    }

    pub fn script(&self) -> &Rc<Script> {
        &self.script
    }
}

impl CoroutineFrame<Value> for ScriptFrame {
    fn resume(&mut self) -> Yielded<Value> {
        let step = match self.script.steps.get(self.cursor) {
            Some(step) => step,
            None => return Yielded::Done,
        };
        self.cursor += 1;

        match step {
            ScriptStep::Wait(ticks) => Yielded::Wait(*ticks),
            ScriptStep::Call(child) => Yielded::nested(ScriptFrame::new(Rc::clone(child))),
            ScriptStep::Signal(value) => Yielded::Signal(value.clone()),
            ScriptStep::Done => {
                self.cursor = self.script.steps.len();
                Yielded::Done
            }
        }
    }

    fn producer(&self) -> ProducerId {
        self.script.producer.clone().unwrap_or_else(ProducerId::anonymous)
    }

    fn name(&self) -> &str {
        &self.script.name
    }
}
