//! Coroutine stack implementation
//!
//! The top slot is the frame currently executing. A frame is only resumed
//! once every frame above it has finished.

use super::frame::{CoroutineFrame, FrameId, FrameInfo, Yielded};
use super::SchedulerError;
use std::sync::Arc;

struct Slot<S> {
    info: FrameInfo,
    frame: Box<dyn CoroutineFrame<S>>,
    /// Set once the frame has reported `Done`
    finished: bool,
}

/// Ordered stack of active frames
pub struct CoroutineStack<S> {
    slots: Vec<Slot<S>>,
    next_id: u64,
}

impl<S> Default for CoroutineStack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CoroutineStack<S> {
    /// Create a new empty stack
    pub fn new() -> Self {
        CoroutineStack {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Push a frame, suspending the current top beneath it
    pub fn push(&mut self, frame: Box<dyn CoroutineFrame<S>>) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;

        let info = FrameInfo {
            id,
            producer: frame.producer(),
            name: Arc::from(frame.name()),
        };
        self.slots.push(Slot {
            info,
            frame,
            finished: false,
        });
        id
    }

    /// Pop the top frame, which must have reported `Done`
    ///
    /// Popping an empty stack is a no-op.
    pub fn pop(&mut self) -> Result<Option<FrameInfo>, SchedulerError> {
        match self.slots.last() {
            None => Ok(None),
            Some(slot) if !slot.finished => Err(SchedulerError::ProtocolViolation(format!(
                "cannot pop {} before it reports done",
                slot.info
            ))),
            Some(_) => Ok(self.slots.pop().map(|slot| slot.info)),
        }
    }

    /// Resume the top frame by one step
    ///
    /// Returns `None` when the stack is empty. A finished top is not resumed
    /// again and keeps reporting `Done`.
    pub fn resume_top(&mut self) -> Option<Yielded<S>> {
        let slot = self.slots.last_mut()?;
        if slot.finished {
            return Some(Yielded::Done);
        }
        let yielded = slot.frame.resume();
        if let Yielded::Done = yielded {
            slot.finished = true;
        }
        Some(yielded)
    }

    /// Peek at the top frame without popping
    pub fn peek(&self) -> Option<FrameInfo> {
        self.slots.last().map(|slot| slot.info.clone())
    }

    /// Id of the top frame
    pub fn top_id(&self) -> Option<FrameId> {
        self.slots.last().map(|slot| slot.info.id)
    }

    /// Snapshot of all frames, bottom to top
    pub fn frames(&self) -> Vec<FrameInfo> {
        self.slots.iter().map(|slot| slot.info.clone()).collect()
    }

    /// Get the current stack depth
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
