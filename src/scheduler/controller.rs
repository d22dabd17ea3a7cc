//! Step controller
//!
//! Drives a [`CoroutineStack`] one external tick at a time. Within a single
//! update the controller keeps stepping while the top of the stack changes
//! identity and the swap policy lets the new top run immediately:
//!
//! ```text
//! update():
//!   waiting?            -> count down, stop
//!   prev = top
//!   resume prev         -> Wait(d): timer = d, stop
//!                          Signal(v): hand v out, stop
//!                          Nested(c): push c
//!                          Done: pop
//!   next = top
//!   next == prev / none -> stop
//!   policy says delay   -> stop, next runs on the following tick
//!   otherwise           -> loop, next runs now
//! ```

use super::frame::{CoroutineFrame, FrameId, FrameInfo, Yielded};
use super::limits::{SchedulerConfig, MAX_WAIT, TICK};
use super::stack::CoroutineStack;
use super::timer::WaitTimer;
use super::SchedulerError;
use crate::policy::{DelaySwapPolicy, SwapRules};

/// Observable scheduler state
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerState {
    /// Empty stack
    Idle,
    /// Suspended until the timer elapses
    Waiting(f32),
    /// The given frame runs on the next update
    Running(FrameInfo),
    /// Stepping suspended by `set_active(false)`; stack and timer are kept
    Paused,
    /// Stopped by an error until `reset()`
    Halted,
}

/// Work done during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Frame resumptions
    pub steps: u32,
    /// Times the top of the stack changed identity
    pub swaps: u32,
    /// Whether the update ended on a delayed swap
    pub delayed_swap: bool,
}

/// Outcome of one update
#[derive(Debug, Clone, PartialEq)]
pub enum Tick<S> {
    Idle,
    Paused,
    Halted,
    Waiting { remaining: f32 },
    Stepped(StepReport),
    Signalled { signal: S, report: StepReport },
}

impl<S> Tick<S> {
    /// Report of the frame work done, if any ran
    pub fn report(&self) -> Option<&StepReport> {
        match self {
            Tick::Stepped(report) | Tick::Signalled { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn steps(&self) -> u32 {
        self.report().map_or(0, |r| r.steps)
    }
}

/// Frame-stepped coroutine scheduler
pub struct StepController<S> {
    stack: CoroutineStack<S>,
    timer: WaitTimer,
    policy: Box<dyn DelaySwapPolicy>,
    config: SchedulerConfig,
    active: bool,
    finished: bool,
    halted: Option<SchedulerError>,
}

impl<S> Default for StepController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StepController<S> {
    /// Create an idle controller with the default configuration and an empty
    /// rule table (swaps are not delayed)
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        StepController {
            stack: CoroutineStack::new(),
            timer: WaitTimer::new(),
            policy: Box::new(SwapRules::new()),
            config,
            active: true,
            finished: false,
            halted: None,
        }
    }

    /// Builder form of [`StepController::set_policy`]
    pub fn with_policy(mut self, policy: impl DelaySwapPolicy + 'static) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn set_policy(&mut self, policy: impl DelaySwapPolicy + 'static) {
        self.policy = Box::new(policy);
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn force_delayed_swap(&self) -> bool {
        self.config.force_delayed_swap
    }

    /// Make every swap cost a tick regardless of the policy
    pub fn set_force_delayed_swap(&mut self, force: bool) {
        self.config.force_delayed_swap = force;
    }

    /// Push a frame on top of the stack
    ///
    /// # Errors
    /// - `NestingTooDeep` if the stack is already at `max_depth`
    pub fn push(&mut self, frame: impl CoroutineFrame<S> + 'static) -> Result<FrameId, SchedulerError> {
        self.push_boxed(Box::new(frame))
    }

    pub fn push_boxed(&mut self, frame: Box<dyn CoroutineFrame<S>>) -> Result<FrameId, SchedulerError> {
        if self.stack.depth() >= self.config.max_depth {
            return Err(SchedulerError::NestingTooDeep {
                depth: self.stack.depth() + 1,
            });
        }
        let id = self.stack.push(frame);
        self.finished = false;
        log::debug!("pushed frame {} at depth {}", id, self.stack.depth());
        Ok(id)
    }

    /// Top of the stack
    pub fn peek(&self) -> Option<FrameInfo> {
        self.stack.peek()
    }

    /// All frames, bottom to top
    pub fn frames(&self) -> Vec<FrameInfo> {
        self.stack.frames()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Treat a pending wait as elapsed; the next update resumes the top frame
    pub fn jump(&mut self) {
        if self.timer.is_pending() {
            log::debug!("jump skips {} remaining ticks", self.timer.remaining());
        }
        self.timer.jump();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pause or resume stepping; a paused controller ignores updates
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// True once the stack drained or was cancelled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn halt_reason(&self) -> Option<&SchedulerError> {
        self.halted.as_ref()
    }

    pub fn state(&self) -> SchedulerState {
        if self.halted.is_some() {
            return SchedulerState::Halted;
        }
        if !self.active {
            return SchedulerState::Paused;
        }
        if self.timer.is_pending() {
            return SchedulerState::Waiting(self.timer.remaining());
        }
        match self.stack.peek() {
            Some(top) => SchedulerState::Running(top),
            None => SchedulerState::Idle,
        }
    }

    /// Drop every frame and any pending wait
    pub fn cancel(&mut self) {
        if !self.stack.is_empty() {
            log::debug!("cancelled {} frames", self.stack.depth());
        }
        self.stack.clear();
        self.timer.jump();
        self.finished = true;
    }

    /// Clear a halt along with the stack and timer
    pub fn reset(&mut self) {
        self.stack.clear();
        self.timer.jump();
        self.halted = None;
        self.active = true;
        self.finished = false;
    }

    /// Restart with a new body
    pub fn replace(&mut self, frame: impl CoroutineFrame<S> + 'static) -> Result<FrameId, SchedulerError> {
        self.reset();
        self.push(frame)
    }

    /// Advance by one tick
    pub fn update(&mut self) -> Result<Tick<S>, SchedulerError> {
        self.update_by(TICK)
    }

    /// Advance with an explicit timer delta, for tick sources that measure
    /// waits in elapsed time rather than ticks
    ///
    /// # Errors
    /// - `ProtocolViolation` if `delta` is negative or not finite. The
    ///   controller is left untouched and does not halt.
    pub fn update_by(&mut self, delta: f32) -> Result<Tick<S>, SchedulerError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(SchedulerError::ProtocolViolation(format!(
                "invalid update delta {}",
                delta
            )));
        }
        if self.halted.is_some() {
            return Ok(Tick::Halted);
        }
        if !self.active {
            return Ok(Tick::Paused);
        }
        if self.timer.is_pending() {
            let remaining = self.timer.tick(delta);
            return Ok(Tick::Waiting { remaining });
        }
        if self.stack.is_empty() {
            return Ok(Tick::Idle);
        }

        match self.run_steps() {
            Ok(tick) => Ok(tick),
            Err(e) => {
                log::warn!("coroutine halted: {}", e);
                self.halted = Some(e.clone());
                Err(e)
            }
        }
    }

    fn run_steps(&mut self) -> Result<Tick<S>, SchedulerError> {
        let mut report = StepReport::default();

        loop {
            let prev = match self.stack.peek() {
                Some(prev) => prev,
                None => return Ok(Tick::Stepped(report)),
            };

            if report.steps >= self.config.max_steps_per_tick {
                return Err(SchedulerError::RunawayCoroutine { steps: report.steps });
            }
            report.steps += 1;

            let yielded = match self.stack.resume_top() {
                Some(yielded) => yielded,
                None => return Ok(Tick::Stepped(report)),
            };
            log::trace!("{} yielded {}", prev, yielded.kind());

            match yielded {
                Yielded::Wait(duration) => {
                    if !(0.0..=MAX_WAIT).contains(&duration) {
                        return Err(SchedulerError::ProtocolViolation(format!(
                            "{} yielded invalid wait duration {}",
                            prev, duration
                        )));
                    }
                    self.timer.set(duration);
                }
                Yielded::Signal(signal) => return Ok(Tick::Signalled { signal, report }),
                Yielded::Nested(child) => {
                    self.push_boxed(child)?;
                }
                Yielded::Done => {
                    self.stack.pop()?;
                    if self.stack.is_empty() {
                        log::debug!("{} finished, stack drained", prev);
                        self.finished = true;
                    }
                }
            }

            let next = match self.stack.peek() {
                Some(next) if next.id != prev.id => next,
                _ => return Ok(Tick::Stepped(report)),
            };

            report.swaps += 1;
            if self.config.force_delayed_swap || self.policy.should_delay(Some(&prev), &next) {
                log::debug!("delayed swap {} -> {}", prev, next);
                report.delayed_swap = true;
                return Ok(Tick::Stepped(report));
            }
            log::trace!("swap {} -> {} within the same tick", prev, next);
        }
    }
}
