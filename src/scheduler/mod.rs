//! Frame-stepped coroutine scheduler
//!
//! This module provides the stepping engine: resumable frames, the stack that
//! nests them, the wait timer, and the controller that advances the stack once
//! per external tick.

pub mod controller;
pub mod frame;
pub mod limits;
pub mod stack;
pub mod test_utils;
pub mod timer;

pub use controller::{SchedulerState, StepController, StepReport, Tick};
pub use frame::{CoroutineFrame, FrameId, FrameInfo, Named, ProducerId, Yielded};
pub use limits::SchedulerConfig;
pub use stack::CoroutineStack;
pub use timer::WaitTimer;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("Runaway coroutine: exceeded {steps} steps in a single update")]
    RunawayCoroutine { steps: u32 },
    #[error("Coroutine nesting too deep: {depth}")]
    NestingTooDeep { depth: usize },
}
