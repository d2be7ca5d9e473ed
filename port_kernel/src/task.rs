//! Task lifecycle on host threads
//!
//! Every logical task becomes one host thread. Creation is explicit: the
//! caller provides a [`TaskSpec`] and an owned entry closure, so the
//! argument's lifetime moves into the task instead of being a caller
//! obligation. Name and stack size are forwarded to the thread builder;
//! priority and core affinity are advisory and ignored by the host scheduler.

use port_types::{StatusCode, TaskId, Ticks};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Unwind payload used by [`exit_current_task`]; the spawn trampoline treats
/// it as normal termination.
struct TaskExit;

/// Errors from task creation and teardown.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The host refused to create the thread (resource exhaustion).
    #[error("Failed to spawn task: {0}")]
    SpawnFailed(String),

    /// The task's entry function panicked.
    #[error("Task '{0}' panicked")]
    Panicked(String),
}

impl TaskError {
    /// Maps this error into the closed status-code table.
    pub fn status(&self) -> StatusCode {
        match self {
            TaskError::SpawnFailed(_) => StatusCode::NoMem,
            TaskError::Panicked(_) => StatusCode::Fail,
        }
    }
}

/// Descriptor for creating a new task.
///
/// Priority and core affinity are accepted for contract compatibility only;
/// the host scheduler does not honor them.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Human-readable name, forwarded to the host thread.
    pub name: String,
    /// Requested stack size in bytes, forwarded to the host thread.
    pub stack_size: Option<usize>,
    /// Requested priority (advisory, ignored).
    pub priority: u8,
    /// Requested core (advisory, ignored).
    pub core_affinity: Option<u32>,
}

impl TaskSpec {
    /// Creates a task spec with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_size: None,
            priority: 0,
            core_affinity: None,
        }
    }

    /// Requests a stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Records a priority hint.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Records a core-affinity hint.
    pub fn with_core_affinity(mut self, core: u32) -> Self {
        self.core_affinity = Some(core);
        self
    }
}

/// Handle to a spawned task.
///
/// Dropping the handle detaches the task; it keeps running until its entry
/// returns or it calls [`exit_current_task`]. There is no way to terminate
/// another task through its handle — cancellation is the task's own logic.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    name: String,
    join: thread::JoinHandle<()>,
}

impl TaskHandle {
    /// Returns the task's identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detaches the task, leaving it running.
    pub fn detach(self) {}

    /// Waits for the task to finish.
    ///
    /// An orderly self-termination counts as success; any other panic in the
    /// entry function surfaces as [`TaskError::Panicked`].
    pub fn join(self) -> Result<(), TaskError> {
        self.join
            .join()
            .map_err(|_| TaskError::Panicked(self.name))
    }
}

/// Spawns a new task running `entry`.
pub fn spawn<F>(spec: TaskSpec, entry: F) -> Result<TaskHandle, TaskError>
where
    F: FnOnce() + Send + 'static,
{
    let mut builder = thread::Builder::new().name(spec.name.clone());
    if let Some(bytes) = spec.stack_size {
        builder = builder.stack_size(bytes);
    }
    let join = builder
        .spawn(move || run_entry(entry))
        .map_err(|err| TaskError::SpawnFailed(err.to_string()))?;
    Ok(TaskHandle {
        id: TaskId::new(),
        name: spec.name,
        join,
    })
}

/// Spawns a new task with a core-affinity hint.
///
/// The contract is identical to [`spawn`]; the hint is recorded in the spec
/// and silently ignored by the host scheduler.
pub fn spawn_pinned<F>(spec: TaskSpec, core: u32, entry: F) -> Result<TaskHandle, TaskError>
where
    F: FnOnce() + Send + 'static,
{
    spawn(spec.with_core_affinity(core), entry)
}

fn run_entry<F: FnOnce()>(entry: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(entry)) {
        if !payload.is::<TaskExit>() {
            panic::resume_unwind(payload);
        }
    }
}

/// Ends the calling task immediately.
///
/// Only the calling task is affected. Code after this call never runs;
/// destructors of values alive on the task's stack do run.
pub fn exit_current_task() -> ! {
    // resume_unwind skips the panic hook, so an orderly exit is silent.
    panic::resume_unwind(Box::new(TaskExit))
}

/// Suspends the calling task for at least `duration`.
///
/// Host scheduler jitter applies; there is no upper bound guarantee.
pub fn delay(duration: Duration) {
    thread::sleep(duration);
}

/// Periodic delay relative to a caller-tracked reference tick.
///
/// Degrades to an ordinary [`delay`] and advances the reference by the
/// period: drift against the true period is not corrected. This is a
/// documented fidelity limitation versus a real periodic scheduler.
pub fn delay_until(last_wake: &mut Ticks, period: Duration) {
    delay(period);
    *last_wake = last_wake.advanced_by(period.as_millis() as u32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_spawn_runs_entry() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let handle = spawn(TaskSpec::new("worker"), move || {
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();
        handle.join().unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_spawn_forwards_name_and_accepts_hints() {
        let spec = TaskSpec::new("hinted")
            .with_stack_size(128 * 1024)
            .with_priority(5)
            .with_core_affinity(1);
        let handle = spawn(spec, || {}).unwrap();
        assert_eq!(handle.name(), "hinted");
        handle.join().unwrap();
    }

    #[test]
    fn test_spawn_pinned_ignores_core_hint() {
        let handle = spawn_pinned(TaskSpec::new("pinned"), 3, || {}).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_handles_get_distinct_ids() {
        let h1 = spawn(TaskSpec::new("a"), || {}).unwrap();
        let h2 = spawn(TaskSpec::new("b"), || {}).unwrap();
        assert_ne!(h1.id(), h2.id());
        h1.join().unwrap();
        h2.join().unwrap();
    }

    #[test]
    fn test_exit_current_task_stops_only_the_rest_of_the_entry() {
        let before = Arc::new(AtomicBool::new(false));
        let after = Arc::new(AtomicBool::new(false));
        let (b, a) = (Arc::clone(&before), Arc::clone(&after));
        let handle = spawn(TaskSpec::new("quitter"), move || {
            b.store(true, Ordering::SeqCst);
            exit_current_task();
            #[allow(unreachable_code)]
            a.store(true, Ordering::SeqCst);
        })
        .unwrap();
        handle.join().unwrap();
        assert!(before.load(Ordering::SeqCst));
        assert!(!after.load(Ordering::SeqCst));
    }

    #[test]
    fn test_join_reports_entry_panic() {
        let handle = spawn(TaskSpec::new("crasher"), || panic!("boom")).unwrap();
        let err = handle.join().unwrap_err();
        assert_eq!(err, TaskError::Panicked("crasher".to_string()));
        assert_eq!(err.status(), StatusCode::Fail);
    }

    #[test]
    fn test_spawn_failure_maps_to_no_mem() {
        let err = TaskError::SpawnFailed("out of threads".to_string());
        assert_eq!(err.status(), StatusCode::NoMem);
    }

    #[test]
    fn test_delay_lower_bound() {
        for ms in [0u64, 1, 100] {
            let started = Instant::now();
            delay(Duration::from_millis(ms));
            assert!(started.elapsed() >= Duration::from_millis(ms));
        }
    }

    #[test]
    fn test_delay_until_advances_reference_tick() {
        let mut last_wake = Ticks::new(1000);
        let started = Instant::now();
        delay_until(&mut last_wake, Duration::from_millis(10));
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(last_wake, Ticks::new(1010));
    }
}
