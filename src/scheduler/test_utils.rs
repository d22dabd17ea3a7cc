//! Test utilities for scheduler testing
//!
//! Probe frames record their name every time they are resumed so tests can
//! check exactly which frames ran during which tick.
