//! Swap-delay policies
//!
//! When the top of a coroutine stack changes identity during an update, the
//! controller asks a [`DelaySwapPolicy`] whether the newly active frame must
//! wait for the next tick or may run straight away.

pub mod rules;
pub mod version;

pub use rules::{ProducerMatch, Subject, SwapRule, SwapRules};
pub use version::Version;

use crate::scheduler::FrameInfo;

/// Decides whether a frame swap costs an idle tick
pub trait DelaySwapPolicy {
    /// `prev` is the top before the step (absent if the stack was empty),
    /// `next` the top after it.
    fn should_delay(&self, prev: Option<&FrameInfo>, next: &FrameInfo) -> bool;
}

/// Every swap waits for the next tick
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysDelay;

impl DelaySwapPolicy for AlwaysDelay {
    fn should_delay(&self, _prev: Option<&FrameInfo>, _next: &FrameInfo) -> bool {
        true
    }
}

/// Swaps never cost a tick
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverDelay;

impl DelaySwapPolicy for NeverDelay {
    fn should_delay(&self, _prev: Option<&FrameInfo>, _next: &FrameInfo) -> bool {
        false
    }
}

impl<F> DelaySwapPolicy for F
where
    F: Fn(Option<&FrameInfo>, &FrameInfo) -> bool,
{
    fn should_delay(&self, prev: Option<&FrameInfo>, next: &FrameInfo) -> bool {
        self(prev, next)
    }
}
