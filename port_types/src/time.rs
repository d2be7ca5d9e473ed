//! Tick counter and wait hints
//!
//! Scheduling code in the ported applications thinks in coarse millisecond
//! ticks that wrap around a 32-bit counter. [`Ticks`] keeps that arithmetic
//! explicit and wraparound-tolerant. [`Wait`] replaces the original magic
//! tick-count argument (0 / N / max) with a typed hint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A millisecond tick reading from the monotonic clock.
///
/// The counter wraps at `u32::MAX`; comparisons must go through
/// [`Ticks::since`], which is wraparound-tolerant, never through `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticks(u32);

impl Ticks {
    /// Creates a tick value from a raw counter reading.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the number of ticks elapsed since `earlier`.
    ///
    /// Correct across a single counter wrap: `Ticks::new(5).since(Ticks::new(u32::MAX - 4))`
    /// is 10, not a huge negative-looking value.
    pub const fn since(self, earlier: Ticks) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Returns this reading advanced by `millis`, wrapping on overflow.
    pub const fn advanced_by(self, millis: u32) -> Ticks {
        Ticks(self.0.wrapping_add(millis))
    }
}

/// Caller-supplied maximum blocking duration for an operation that may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Fail immediately if the operation cannot complete now.
    NoWait,
    /// Block up to the given duration, then fail.
    For(Duration),
    /// Block until the operation completes.
    Forever,
}

impl Wait {
    /// Converts a raw millisecond hint: 0 means no wait, `u32::MAX` means
    /// wait forever, anything else is a bounded wait.
    pub fn from_millis(millis: u32) -> Self {
        match millis {
            0 => Wait::NoWait,
            u32::MAX => Wait::Forever,
            ms => Wait::For(Duration::from_millis(ms as u64)),
        }
    }

    /// Returns whether this hint forbids blocking.
    pub fn is_no_wait(self) -> bool {
        matches!(self, Wait::NoWait)
            || matches!(self, Wait::For(d) if d.is_zero())
    }
}
