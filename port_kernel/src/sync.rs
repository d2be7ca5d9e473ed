//! Mutual-exclusion lock domains
//!
//! A [`LockDomain`] is one binary mutual-exclusion domain: at most one holder
//! at any time. The ported applications use two of them — a general-purpose
//! critical section and a UI-subsystem lock — as *independent* instances;
//! holding one confers nothing about the other, and ordering between domains
//! is the caller's problem.
//!
//! Domains are explicitly constructed, caller-held objects rather than
//! process-wide singletons, so tests can instantiate independent instances
//! without cross-test interference.
//!
//! Caller obligations: the domain is not re-entrant (re-entering from the
//! holding task deadlocks), and deadlock avoidance across domains is not
//! enforced here.

use port_types::Wait;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

/// A named binary mutual-exclusion domain.
#[derive(Debug)]
pub struct LockDomain {
    label: String,
    held: Mutex<bool>,
    released: Condvar,
}

/// Proof of holding a [`LockDomain`]; releases the domain on drop.
#[derive(Debug)]
pub struct DomainGuard<'a> {
    domain: &'a LockDomain,
}

impl LockDomain {
    /// Creates an unheld domain with a diagnostic label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// Returns the diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Acquires the domain, blocking until it is free.
    pub fn enter(&self) -> DomainGuard<'_> {
        let mut held = self.lock_state();
        while *held {
            held = match self.released.wait(held) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        *held = true;
        DomainGuard { domain: self }
    }

    /// Acquires the domain within the wait hint, or returns `None`.
    ///
    /// [`Wait::Forever`] is equivalent to [`LockDomain::enter`] and always
    /// succeeds eventually.
    pub fn try_enter_for(&self, wait: Wait) -> Option<DomainGuard<'_>> {
        let mut held = self.lock_state();
        if *held {
            match wait {
                Wait::NoWait => return None,
                Wait::Forever => {
                    while *held {
                        held = match self.released.wait(held) {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                    }
                }
                Wait::For(limit) => {
                    let deadline = Instant::now() + limit;
                    while *held {
                        let now = Instant::now();
                        if now >= deadline {
                            return None;
                        }
                        held = match self.released.wait_timeout(held, deadline - now) {
                            Ok((guard, _timed_out)) => guard,
                            Err(poisoned) => poisoned.into_inner().0,
                        };
                    }
                }
            }
        }
        *held = true;
        Some(DomainGuard { domain: self })
    }

    fn lock_state(&self) -> MutexGuard<'_, bool> {
        match self.held.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for DomainGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.domain.lock_state();
        *held = false;
        self.domain.released.notify_one();
    }
}
