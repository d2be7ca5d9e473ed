//! # Port Kernel
//!
//! This crate re-implements the concurrency primitives the ported
//! applications were written against, on top of host threads.
//!
//! ## Philosophy
//!
//! The original API ran on a cooperative embedded scheduler; here every task
//! is an independently scheduled host thread, and the layer's job is to keep
//! the *calling contract* intact:
//!
//! - Task creation semantics (spawn, advisory hints, self-termination)
//! - Blocking bounded-queue send/receive with strict FIFO ordering
//! - Independent mutual-exclusion domains
//! - Counting task notifications
//! - Software-timer handles behind a swappable driver trait
//!
//! ## Non-Goals
//!
//! Priority scheduling, core pinning, and deterministic timing are not
//! emulated. Priority and affinity hints are accepted and ignored; the host
//! scheduler is authoritative.

pub mod notify;
pub mod queue;
pub mod sync;
pub mod task;
pub mod timer;

pub use notify::Notification;
pub use queue::{BoundedQueue, QueueError};
pub use sync::{DomainGuard, LockDomain};
pub use task::{delay, delay_until, exit_current_task, spawn, spawn_pinned, TaskError, TaskHandle, TaskSpec};
pub use timer::{InertTimerDriver, TimerCallback, TimerDriver, TimerError, TimerSpec};
