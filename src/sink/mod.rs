//! Report sink shared by the discovery and cleanup pipelines
//!
//! Every user-facing line goes through a [`ReportSink`]. The sink is the
//! serialization point when a front end drives the engine from another
//! thread, so implementations must be `Send + Sync` and hold their own lock.

use std::io::Write;
use std::sync::Mutex;

use chrono::{DateTime, Local};

/// Append-only, timestamped message channel
pub trait ReportSink: Send + Sync {
    /// Record a message stamped with `at`
    fn emit_at(&self, at: DateTime<Local>, message: &str);

    /// Record a message stamped with the current local time
    fn emit(&self, message: &str) {
        self.emit_at(Local::now(), message);
    }
}

/// Formats a line the way the log pane shows it: `[HH:MM:SS] message`
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("[{}] {message}", at.format("%H:%M:%S"))
}

/// Sink that writes each line to the console
#[derive(Debug, Default)]
pub struct ConsoleSink {
    lock: Mutex<()>,
    to_stderr: bool,
}

impl ConsoleSink {
    /// Lines go to standard output
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines go to standard error, leaving stdout for machine-readable output
    pub fn stderr() -> Self {
        Self {
            to_stderr: true,
            ..Self::default()
        }
    }
}

impl ReportSink for ConsoleSink {
    fn emit_at(&self, at: DateTime<Local>, message: &str) {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let line = format_line(at, message);
        // A closed stream (e.g. piped into `head`) must not abort a cleanup.
        let _ = if self.to_stderr {
            writeln!(std::io::stderr().lock(), "{line}")
        } else {
            writeln!(std::io::stdout().lock(), "{line}")
        };
    }
}

/// Sink that keeps messages in memory for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages without their timestamp prefix, in emission order
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Number of messages containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

#[cfg(test)]
impl ReportSink for MemorySink {
    fn emit_at(&self, _at: DateTime<Local>, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}
