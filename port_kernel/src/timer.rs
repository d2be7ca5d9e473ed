//! Software timer driver
//!
//! Timer handles exist so dependent code compiles and runs unmodified; the
//! minimum conformance level is "accepts all calls, returns success, never
//! blocks or crashes". The driver is a capability trait so a fully firing
//! implementation can be swapped in without touching call sites.
//!
//! [`InertTimerDriver`] is that minimal implementation: it validates ids and
//! tracks per-timer state so diagnostics and tests can observe it, but never
//! invokes callbacks.
//!
//! There is no global timer subsystem to initialize or tear down:
//! constructing a driver is initialization, and dropping it releases every
//! timer it owns.

use port_types::{StatusCode, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Callback invoked when a timer fires (never invoked by the inert driver).
pub type TimerCallback = Box<dyn FnMut(TimerId) + Send>;

/// Timer operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The id does not refer to a live timer of this driver.
    #[error("Unknown timer: {0}")]
    UnknownTimer(TimerId),
}

impl TimerError {
    /// Maps this error into the closed status-code table.
    pub fn status(&self) -> StatusCode {
        match self {
            TimerError::UnknownTimer(_) => StatusCode::InvalidArg,
        }
    }
}

/// Descriptor for creating a software timer.
#[derive(Debug, Clone)]
pub struct TimerSpec {
    /// Human-readable name for diagnostics.
    pub name: String,
    /// Period between fires.
    pub period: Duration,
    /// Whether the timer restarts itself after firing.
    pub auto_reload: bool,
}

impl TimerSpec {
    /// Creates a one-shot timer spec.
    pub fn new(name: impl Into<String>, period: Duration) -> Self {
        Self {
            name: name.into(),
            period,
            auto_reload: false,
        }
    }

    /// Makes the timer periodic.
    pub fn auto_reload(mut self) -> Self {
        self.auto_reload = true;
        self
    }
}

/// Capability interface for software timers.
pub trait TimerDriver {
    /// Registers a timer and returns its handle. The timer starts stopped.
    fn create(&mut self, spec: TimerSpec, callback: TimerCallback) -> TimerId;

    /// Starts (or restarts) the timer.
    fn start(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Stops the timer; a stopped timer may be started again.
    fn stop(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Changes the timer's period; the timer keeps its running state.
    fn change_period(&mut self, id: TimerId, period: Duration) -> Result<(), TimerError>;

    /// Removes the timer; its id becomes invalid.
    fn delete(&mut self, id: TimerId) -> Result<(), TimerError>;

    /// Returns whether the timer is currently started.
    fn is_running(&self, id: TimerId) -> Result<bool, TimerError>;

    /// Returns the timer's configured period.
    fn period(&self, id: TimerId) -> Result<Duration, TimerError>;
}

struct TimerEntry {
    spec: TimerSpec,
    running: bool,
    // Held so the contract matches a firing driver; the inert driver never
    // calls it.
    _callback: TimerCallback,
}

/// Timer driver that tracks state but never fires callbacks.
#[derive(Default)]
pub struct InertTimerDriver {
    timers: HashMap<TimerId, TimerEntry>,
}

impl InertTimerDriver {
    /// Creates an empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn entry_mut(&mut self, id: TimerId) -> Result<&mut TimerEntry, TimerError> {
        self.timers.get_mut(&id).ok_or(TimerError::UnknownTimer(id))
    }

    fn entry(&self, id: TimerId) -> Result<&TimerEntry, TimerError> {
        self.timers.get(&id).ok_or(TimerError::UnknownTimer(id))
    }
}

impl TimerDriver for InertTimerDriver {
    fn create(&mut self, spec: TimerSpec, callback: TimerCallback) -> TimerId {
        let id = TimerId::new();
        self.timers.insert(
            id,
            TimerEntry {
                spec,
                running: false,
                _callback: callback,
            },
        );
        id
    }

    fn start(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.entry_mut(id)?.running = true;
        Ok(())
    }

    fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.entry_mut(id)?.running = false;
        Ok(())
    }

    fn change_period(&mut self, id: TimerId, period: Duration) -> Result<(), TimerError> {
        self.entry_mut(id)?.spec.period = period;
        Ok(())
    }

    fn delete(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.timers
            .remove(&id)
            .map(|_| ())
            .ok_or(TimerError::UnknownTimer(id))
    }

    fn is_running(&self, id: TimerId) -> Result<bool, TimerError> {
        Ok(self.entry(id)?.running)
    }

    fn period(&self, id: TimerId) -> Result<Duration, TimerError> {
        Ok(self.entry(id)?.spec.period)
    }
}
