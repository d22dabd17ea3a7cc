//! Rule-table swap policy
//!
//! Frames built by older producers expect every swap to cost a tick, while
//! newer producers opt out of the extra frame. [`SwapRules`] captures that as
//! an ordered list of rules evaluated against a registry mapping each producer
//! to the API version it targets. The first matching rule decides; if none
//! matches, the fallback decision applies.
//!
//! ```text
//! { "producers": { "speedrun-tools": "1.3000.0" },
//!   "rules": [ { "when": { "targets_at_least": "1.2563.0" }, "delay": false },
//!              { "when": { "producer": "host" }, "delay": true } ],
//!   "otherwise": false }
//! ```

use super::version::Version;
use super::DelaySwapPolicy;
use crate::scheduler::limits::{read_file, ConfigError};
use crate::scheduler::{FrameInfo, ProducerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Which side of a swap a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// The frame that was on top before the step
    Prev,
    /// The frame that is on top after the step
    Next,
}

impl Default for Subject {
    fn default() -> Self {
        Subject::Prev
    }
}

/// Condition on the subject frame's producer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerMatch {
    Any,
    Producer(ProducerId),
    TargetsAtLeast(Version),
    TargetsBelow(Version),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwapRule {
    #[serde(default)]
    pub subject: Subject,
    pub when: ProducerMatch,
    pub delay: bool,
}

impl SwapRule {
    pub fn new(when: ProducerMatch, delay: bool) -> Self {
        SwapRule {
            subject: Subject::Prev,
            when,
            delay,
        }
    }

    pub fn on(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }
}

/// Ordered swap rules plus the producer version registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwapRules {
    producers: BTreeMap<ProducerId, Version>,
    rules: Vec<SwapRule>,
    otherwise: bool,
}

impl SwapRules {
    /// Empty table: no rules, swaps are not delayed
    pub fn new() -> Self {
        Self::default()
    }

    /// Newer producers never delay, frames from `host` always do, anything
    /// else does not.
    pub fn legacy(host: impl Into<ProducerId>, threshold: Version) -> Self {
        SwapRules::new()
            .rule(SwapRule::new(ProducerMatch::TargetsAtLeast(threshold), false))
            .rule(SwapRule::new(ProducerMatch::Producer(host.into()), true))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    /// Record the API version a producer targets
    pub fn producer(mut self, id: impl Into<ProducerId>, version: Version) -> Self {
        self.register(id, version);
        self
    }

    pub fn register(&mut self, id: impl Into<ProducerId>, version: Version) {
        self.producers.insert(id.into(), version);
    }

    /// Append a rule; earlier rules take precedence
    pub fn rule(mut self, rule: SwapRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Decision when no rule matches
    pub fn otherwise(mut self, delay: bool) -> Self {
        self.otherwise = delay;
        self
    }

    pub fn rules(&self) -> &[SwapRule] {
        &self.rules
    }

    /// Version a producer targets; unregistered producers target 0.0.0
    pub fn target_version(&self, producer: &ProducerId) -> Version {
        self.producers.get(producer).copied().unwrap_or(Version::ZERO)
    }

    fn matches(&self, when: &ProducerMatch, frame: &FrameInfo) -> bool {
        match when {
            ProducerMatch::Any => true,
            ProducerMatch::Producer(id) => frame.producer == *id,
            ProducerMatch::TargetsAtLeast(v) => self.target_version(&frame.producer) >= *v,
            ProducerMatch::TargetsBelow(v) => self.target_version(&frame.producer) < *v,
        }
    }
}

impl DelaySwapPolicy for SwapRules {
    fn should_delay(&self, prev: Option<&FrameInfo>, next: &FrameInfo) -> bool {
        for rule in &self.rules {
            let subject = match rule.subject {
                Subject::Prev => prev,
                Subject::Next => Some(next),
            };
            if let Some(frame) = subject {
                if self.matches(&rule.when, frame) {
                    log::trace!("swap rule {:?} matched {} -> delay={}", rule.when, frame, rule.delay);
                    return rule.delay;
                }
            }
        }
        self.otherwise
    }
}
