//! Serialized diagnostic logger
//!
//! A single textual sink shared by every task. Each call emits exactly one
//! line of the form `[<level>] <tag>: <message>`; the sink mutex guarantees
//! that concurrent calls never interleave within a line.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    /// Single-letter code used in the line prefix.
    pub const fn code(self) -> &'static str {
        match self {
            LogLevel::Debug => "D",
            LogLevel::Info => "I",
            LogLevel::Warn => "W",
            LogLevel::Error => "E",
        }
    }
}

/// Handle to the shared log sink.
///
/// Cloning the logger clones the handle, not the sink; all clones serialize
/// through the same mutex. Write errors are swallowed: diagnostics must never
/// take down the tasks that emit them.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Logger {
    /// Creates a logger over an arbitrary sink.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Creates a logger writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes one formatted line at the given level.
    pub fn log(&self, level: LogLevel, tag: &str, message: &str) {
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            // A writer panicked mid-line; the sink contents are already
            // suspect, so keep logging rather than poisoning every caller.
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(sink, "[{}] {}: {}", level.code(), tag, message);
        let _ = sink.flush();
    }

    /// Logs at [`LogLevel::Debug`].
    pub fn debug(&self, tag: &str, message: &str) {
        self.log(LogLevel::Debug, tag, message);
    }

    /// Logs at [`LogLevel::Info`].
    pub fn info(&self, tag: &str, message: &str) {
        self.log(LogLevel::Info, tag, message);
    }

    /// Logs at [`LogLevel::Warn`].
    pub fn warn(&self, tag: &str, message: &str) {
        self.log(LogLevel::Warn, tag, message);
    }

    /// Logs at [`LogLevel::Error`].
    pub fn error(&self, tag: &str, message: &str) {
        self.log(LogLevel::Error, tag, message);
    }
}
