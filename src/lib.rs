//! A frame-stepped coroutine scheduler.
//!
//! framestep advances a stack of nested coroutines once per external tick,
//! the way a game loop drives cutscenes, timed effects, and other scripted
//! sequences. Frames yield to wait a number of ticks, start a child frame,
//! hand a signal to the caller, or finish. When the top of the stack changes
//! within one update, a pluggable policy decides whether the newly active
//! frame starts straight away or only on the next tick.
//!
//! # Modules
//!
//! - [`scheduler`] -- Frames, the coroutine stack, the wait timer, and the step controller.
//! - [`policy`] -- Swap-delay policies, including the producer/version rule table.
//! - [`script`] -- JSON-defined frames used by the command-line runner.
//!
//! # Example
//!
//! ```
//! use framestep::policy::NeverDelay;
//! use framestep::scheduler::{frame, StepController, Tick, Yielded};
//!
//! let mut ctl = StepController::new().with_policy(NeverDelay);
//! ctl.push(frame::from_iter(vec![
//!     Yielded::Wait(1.0),
//!     Yielded::Signal("fade-in"),
//! ]))
//! .unwrap();
//!
//! assert_eq!(ctl.update().unwrap().steps(), 1); // yields Wait(1)
//! assert!(matches!(ctl.update().unwrap(), Tick::Waiting { .. }));
//! assert!(matches!(ctl.update().unwrap(), Tick::Signalled { signal: "fade-in", .. }));
//! assert!(matches!(ctl.update().unwrap(), Tick::Stepped(_))); // finishes
//! assert!(ctl.is_finished());
//! ```

pub mod policy;
pub mod scheduler;
pub mod script;
