//! # Port Platform
//!
//! This crate provides the host-facing facades the rest of the port layer
//! leans on: a monotonic clock and a serialized diagnostic logger.
//!
//! ## Philosophy
//!
//! **Time and output are explicit collaborators, not ambient globals.**
//!
//! Callers construct and hold a clock and a logger. Tests construct their own
//! instances (a deterministic manual clock, an in-memory sink) without any
//! cross-test interference.

pub mod clock;
pub mod log;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use log::{LogLevel, Logger};
