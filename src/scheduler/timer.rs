//! Wait timer owned by the step controller

/// Countdown that suspends stepping while positive
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WaitTimer {
    remaining: f32,
}

impl WaitTimer {
    pub fn new() -> Self {
        WaitTimer { remaining: 0.0 }
    }

    /// Start a countdown of `duration` ticks
    pub fn set(&mut self, duration: f32) {
        self.remaining = duration;
    }

    /// Whether stepping is suspended
    pub fn is_pending(&self) -> bool {
        self.remaining > 0.0
    }

    /// Count down by `delta`; returns the time still left
    pub fn tick(&mut self, delta: f32) -> f32 {
        self.remaining -= delta;
        self.remaining.max(0.0)
    }

    /// Treat the wait as elapsed
    pub fn jump(&mut self) {
        self.remaining = 0.0;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}
