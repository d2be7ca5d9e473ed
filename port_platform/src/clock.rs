//! Monotonic clock facade
//!
//! The ported applications read time in two units: microseconds since an
//! arbitrary epoch (64-bit) and coarse millisecond ticks (32-bit, wrapping).
//! The two readings are independent queries of the same source; callers must
//! not assume they convert into each other bit-for-bit.

use port_types::Ticks;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic, wraparound-tolerant time source.
pub trait Clock: Send + Sync {
    /// Microseconds elapsed since the clock's arbitrary epoch.
    fn micros(&self) -> u64;

    /// Millisecond tick counter; wraps at `u32::MAX`.
    fn ticks(&self) -> Ticks;
}

/// Host clock anchored at construction time.
///
/// Backed by [`std::time::Instant`], so readings never go backwards.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose epoch is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn ticks(&self) -> Ticks {
        Ticks::new(self.origin.elapsed().as_millis() as u32)
    }
}

/// Deterministic clock that only advances when explicitly told to.
///
/// Tests that need predictable timing drive this instead of the host clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manual clock starting at a specific microsecond reading.
    pub fn with_initial_micros(micros: u64) -> Self {
        Self {
            micros: AtomicU64::new(micros),
        }
    }

    /// Advances the clock by the given number of microseconds.
    pub fn advance_micros(&self, delta: u64) {
        self.micros.fetch_add(delta, Ordering::SeqCst);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_millis(&self, delta: u64) {
        self.advance_micros(delta * 1_000);
    }
}

impl Clock for ManualClock {
    fn micros(&self) -> u64 {
        self.micros.load(Ordering::SeqCst)
    }

    fn ticks(&self) -> Ticks {
        Ticks::new((self.micros() / 1_000) as u32)
    }
}
