//! Counting task notification
//!
//! A lightweight signal for direct task-to-task wakeup. Each `give` adds one
//! to the count and wakes a waiter; `take` consumes from the count, waiting
//! up to the caller's hint for it to become nonzero. The original contract
//! only required calls to be accepted; the counting semantics implemented
//! here are a strict superset (a timed-out take still returns 0).

use port_types::Wait;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

struct Shared {
    count: Mutex<u32>,
    given: Condvar,
}

/// Counting notification shared between a giver and a taker.
///
/// Cloning the notification clones a handle to the same counter.
#[derive(Clone)]
pub struct Notification {
    shared: Arc<Shared>,
}

impl Notification {
    /// Creates a notification with a zero count.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                count: Mutex::new(0),
                given: Condvar::new(),
            }),
        }
    }

    /// Increments the notification count and wakes one waiting task.
    ///
    /// The count saturates rather than wrapping.
    pub fn give(&self) {
        let mut count = self.lock_count();
        *count = count.saturating_add(1);
        self.shared.given.notify_one();
    }

    /// Waits for a nonzero count, then consumes from it.
    ///
    /// Returns the count observed before consuming, or 0 if the hint expired
    /// with nothing given. With `clear_on_exit` the whole count is drained;
    /// otherwise it is decremented by one.
    pub fn take(&self, clear_on_exit: bool, wait: Wait) -> u32 {
        let mut count = self.lock_count();

        if *count == 0 {
            match wait {
                Wait::NoWait => return 0,
                Wait::Forever => {
                    while *count == 0 {
                        count = match self.shared.given.wait(count) {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                    }
                }
                Wait::For(limit) => {
                    let deadline = Instant::now() + limit;
                    while *count == 0 {
                        let now = Instant::now();
                        if now >= deadline {
                            return 0;
                        }
                        count = match self.shared.given.wait_timeout(count, deadline - now) {
                            Ok((guard, _timed_out)) => guard,
                            Err(poisoned) => poisoned.into_inner().0,
                        };
                    }
                }
            }
        }

        let observed = *count;
        *count = if clear_on_exit { 0 } else { observed - 1 };
        observed
    }

    /// Returns the current count without consuming it.
    pub fn count(&self) -> u32 {
        *self.lock_count()
    }

    fn lock_count(&self) -> MutexGuard<'_, u32> {
        match self.shared.count.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}
