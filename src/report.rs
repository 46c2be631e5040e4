//! User-facing message sink.
//!
//! Everything the tool wants the person running it to see (found badges,
//! skipped URLs, failed fetches, fatal errors) goes through a [`Reporter`]
//! handed to the code that produces it, never through a global. Diagnostic
//! detail still goes to `tracing` directly.
//!
//! Three implementations are provided:
//! - [`TracingReporter`] forwards to `tracing` at the matching level.
//! - [`GithubReporter`] prints GitHub Actions workflow commands
//!   (`::warning::`, `::error::`) so the runner annotates the job.
//! - [`RecordingReporter`] keeps every message in memory for assertions.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Progress information.
    Info,
    /// A recoverable problem; the run continues.
    Warning,
    /// A fatal problem; the run fails.
    Error,
}

/// Sink for user-facing messages.
pub trait Reporter: Send + Sync {
    /// Reports progress information.
    fn info(&self, message: &str);

    /// Reports a recoverable problem.
    fn warn(&self, message: &str);

    /// Reports a fatal problem.
    fn error(&self, message: &str);
}

/// Forwards messages to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Prints GitHub Actions workflow commands to stdout.
///
/// Info lines are printed verbatim; warnings and errors become
/// `::warning::` / `::error::` annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubReporter;

impl GithubReporter {
    fn emit(line: &str) {
        let mut stdout = std::io::stdout().lock();
        // Nothing sensible to do if stdout is gone.
        let _ = writeln!(stdout, "{line}");
    }
}

impl Reporter for GithubReporter {
    fn info(&self, message: &str) {
        Self::emit(message);
    }

    fn warn(&self, message: &str) {
        Self::emit(&workflow_command("warning", message));
    }

    fn error(&self, message: &str) {
        Self::emit(&workflow_command("error", message));
    }
}

/// Formats a workflow command, escaping the characters the runner treats
/// specially in command data.
#[must_use]
pub fn workflow_command(command: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{command}::{escaped}")
}

/// Records every message in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded messages in the order they were reported.
    #[must_use]
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns recorded messages of a single level.
    #[must_use]
    pub fn at_level(&self, level: MessageLevel) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Returns recorded info messages.
    #[must_use]
    pub fn infos(&self) -> Vec<String> {
        self.at_level(MessageLevel::Info)
    }

    /// Returns recorded warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.at_level(MessageLevel::Warning)
    }

    /// Returns recorded errors.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.at_level(MessageLevel::Error)
    }

    fn record(&self, level: MessageLevel, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.record(MessageLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(MessageLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(MessageLevel::Error, message);
    }
}
