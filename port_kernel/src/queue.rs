//! Bounded blocking FIFO queue
//!
//! The message channel between tasks. Capacity is fixed at creation; items
//! move in on send and out on receive in strict FIFO order. Head/tail updates
//! happen under one internal mutex, so no partially-updated state is ever
//! visible, and occupancy stays within `[0, capacity]` under any concurrent
//! send/receive pattern.

use port_types::{StatusCode, Wait};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;
use thiserror::Error;

/// Queue operation errors. Full and empty are recoverable conditions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was at capacity for the whole wait hint.
    #[error("Queue is full")]
    Full,

    /// The queue held no item for the whole wait hint.
    #[error("Queue is empty")]
    Empty,

    /// A queue cannot be created with zero capacity.
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,
}

impl QueueError {
    /// Maps this error into the closed status-code table.
    pub fn status(&self) -> StatusCode {
        match self {
            QueueError::Full | QueueError::Empty => StatusCode::Fail,
            QueueError::ZeroCapacity => StatusCode::InvalidArg,
        }
    }
}

#[derive(Debug)]
struct Shared<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> Shared<T> {
    fn lock_items(&self) -> MutexGuard<'_, VecDeque<T>> {
        match self.items.lock() {
            Ok(guard) => guard,
            // A sender or receiver panicked outside the queue's own code
            // path; the deque itself is never left mid-update.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Fixed-capacity FIFO channel for messages between tasks.
///
/// Cloning the queue clones a handle to the same shared state; any clone may
/// send or receive. Items are moved, not referenced: once sent, the item
/// belongs to the queue until a receiver takes it.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send> BoundedQueue<T> {
    /// Creates a queue with the specified capacity.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self {
            shared: Arc::new(Shared {
                items: Mutex::new(VecDeque::with_capacity(capacity)),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
                capacity,
            }),
        })
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.shared.lock_items().len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.shared.lock_items().is_empty()
    }

    /// Returns remaining capacity.
    pub fn remaining_capacity(&self) -> usize {
        self.shared.capacity - self.shared.lock_items().len()
    }

    /// Enqueues an item, blocking up to the wait hint while the queue is full.
    ///
    /// With [`Wait::NoWait`] a full queue fails immediately; otherwise the
    /// caller blocks until space frees or the hint is exhausted, and only the
    /// calling task is suspended.
    pub fn send(&self, item: T, wait: Wait) -> Result<(), QueueError> {
        let shared = &self.shared;
        let mut items = shared.lock_items();

        if items.len() >= shared.capacity {
            items = match wait {
                Wait::NoWait => return Err(QueueError::Full),
                Wait::Forever => {
                    let mut guard = items;
                    while guard.len() >= shared.capacity {
                        guard = match shared.not_full.wait(guard) {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                    }
                    guard
                }
                Wait::For(limit) => {
                    match wait_while_with_deadline(
                        &shared.not_full,
                        items,
                        Instant::now() + limit,
                        |queue| queue.len() >= shared.capacity,
                    ) {
                        Some(guard) => guard,
                        None => return Err(QueueError::Full),
                    }
                }
            };
        }

        items.push_back(item);
        shared.not_empty.notify_one();
        Ok(())
    }

    /// Dequeues the oldest item, blocking up to the wait hint while empty.
    ///
    /// With [`Wait::NoWait`] an empty queue fails immediately. A successful
    /// receive always returns a real sent item, never fabricated data.
    pub fn receive(&self, wait: Wait) -> Result<T, QueueError> {
        let shared = &self.shared;
        let mut items = shared.lock_items();

        if items.is_empty() {
            items = match wait {
                Wait::NoWait => return Err(QueueError::Empty),
                Wait::Forever => {
                    let mut guard = items;
                    while guard.is_empty() {
                        guard = match shared.not_empty.wait(guard) {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                    }
                    guard
                }
                Wait::For(limit) => {
                    match wait_while_with_deadline(
                        &shared.not_empty,
                        items,
                        Instant::now() + limit,
                        |queue| queue.is_empty(),
                    ) {
                        Some(guard) => guard,
                        None => return Err(QueueError::Empty),
                    }
                }
            };
        }

        // Non-empty is guaranteed by the loops above.
        let item = items
            .pop_front()
            .ok_or(QueueError::Empty)?;
        shared.not_full.notify_one();
        Ok(item)
    }
}

/// Waits on `condvar` while `blocked` holds, giving up at `deadline`.
///
/// Returns the guard once the condition clears, or `None` on deadline
/// exhaustion with the condition still holding.
fn wait_while_with_deadline<'a, T, F>(
    condvar: &Condvar,
    mut guard: MutexGuard<'a, T>,
    deadline: Instant,
    blocked: F,
) -> Option<MutexGuard<'a, T>>
where
    F: Fn(&T) -> bool,
{
    while blocked(&guard) {
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        guard = match condvar.wait_timeout(guard, deadline - now) {
            Ok((guard, _timed_out)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        };
    }
    Some(guard)
}
