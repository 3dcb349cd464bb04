//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Thread-safe leveled logger with console and file sinks."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
//! Diagnostic logger owned by the engine runtime.
//!
//! A [`Logger`] writes each accepted call to up to two sinks: the console
//! (see [`ConsoleSink`]) and an append-mode text file. One mutex spans both
//! sinks, so a single call never interleaves with another thread's output.
//! After [`Logger::shutdown`] every call is silently ignored.
#![warn(missing_docs)]

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

pub mod console;
pub mod format;
pub mod level;
pub mod macros;

pub use console::{BufferConsole, ConsoleSink, StdConsole};
pub use format::format_template;
pub use level::{LogLevel, SourceLocation};

/// Default file name used when the caller does not configure one.
pub const DEFAULT_LOG_FILE: &str = "engine.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Errors raised while bringing the logger up.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The file sink could not be opened.
    #[error("unable to open log file {path}: {source}")]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The logger was already shut down and cannot be reopened.
    #[error("logger has been shut down")]
    Closed,
}

/// Thread-safe leveled logger with console and file sinks.
pub struct Logger {
    state: Mutex<LoggerState>,
}

struct LoggerState {
    min_level: LogLevel,
    console_enabled: bool,
    file_enabled: bool,
    file: Option<LineWriter<File>>,
    path: Option<PathBuf>,
    closed: bool,
    console: Box<dyn ConsoleSink>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("min_level", &state.min_level)
            .field("console_enabled", &state.console_enabled)
            .field("file_enabled", &state.file_enabled)
            .field("path", &state.path)
            .field("closed", &state.closed)
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create an unopened logger writing to the process console.
    pub fn new() -> Self {
        Self::with_console(StdConsole)
    }

    /// Create an unopened logger writing console lines to `console`.
    pub fn with_console(console: impl ConsoleSink + 'static) -> Self {
        Self {
            state: Mutex::new(LoggerState {
                min_level: LogLevel::Debug,
                console_enabled: true,
                file_enabled: true,
                file: None,
                path: None,
                closed: false,
                console: Box::new(console),
            }),
        }
    }

    /// Open `path` in append mode and reset the logger to its defaults:
    /// threshold Debug with both sinks enabled.
    ///
    /// Re-initializing an open logger swaps the file sink for the new path.
    pub fn initialize(&self, path: impl AsRef<Path>) -> Result<(), LoggingError> {
        let path = path.as_ref();
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggingError::Closed);
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(mut previous) = state.file.take() {
            let _ = previous.flush();
        }
        state.file = Some(LineWriter::new(file));
        state.path = Some(path.to_path_buf());
        state.min_level = LogLevel::Debug;
        state.console_enabled = true;
        state.file_enabled = true;
        Ok(())
    }

    /// Write `message` to every enabled sink if `level` meets the threshold.
    pub fn log(&self, level: LogLevel, message: &str, location: Option<SourceLocation>) {
        let mut state = self.state.lock();
        if state.closed || level < state.min_level {
            return;
        }

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        if state.console_enabled {
            let line = format!("[{}] [{}] {}", timestamp, level, message);
            let _ = state.console.write_line(level, &line);
        }

        if state.file_enabled {
            let line = match location {
                Some(location) => format!("[{}] [{}] {} ({})", timestamp, level, message, location),
                None => format!("[{}] [{}] {}", timestamp, level, message),
            };
            let LoggerState {
                file, console, path, ..
            } = &mut *state;
            if let Some(file) = file.as_mut() {
                if let Err(err) = writeln!(file, "{}", line) {
                    warn!(path = ?path, error = %err, "log file write failed");
                    let fallback = format!("{} [file sink write failed: {}]", line, err);
                    let _ = console.write_line(LogLevel::Error, &fallback);
                }
            }
        }
    }

    /// Fill `template` via [`format_template`] and log the result.
    pub fn log_format(&self, level: LogLevel, template: &str, args: &[&dyn Display]) {
        if !self.enabled(level) {
            return;
        }
        self.log(level, &format_template(template, args), None);
    }

    /// Log at [`LogLevel::Debug`].
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, None);
    }

    /// Log at [`LogLevel::Info`].
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, None);
    }

    /// Log at [`LogLevel::Warning`].
    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message, None);
    }

    /// Log at [`LogLevel::Error`].
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, None);
    }

    /// Log at [`LogLevel::Critical`].
    pub fn critical(&self, message: &str) {
        self.log(LogLevel::Critical, message, None);
    }

    /// Whether a call at `level` would currently produce output.
    pub fn enabled(&self, level: LogLevel) -> bool {
        let state = self.state.lock();
        !state.closed && level >= state.min_level
    }

    /// Flush and close the file sink. Terminal: later calls are ignored.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        if let Some(mut file) = state.file.take() {
            if let Err(err) = file.flush() {
                warn!(path = ?state.path, error = %err, "log file flush failed during shutdown");
            }
        }
        state.closed = true;
    }

    /// Change the minimum severity threshold.
    pub fn set_min_level(&self, level: LogLevel) {
        self.state.lock().min_level = level;
    }

    /// Current minimum severity threshold.
    pub fn min_level(&self) -> LogLevel {
        self.state.lock().min_level
    }

    /// Enable or disable the console sink.
    pub fn set_console_output(&self, enable: bool) {
        self.state.lock().console_enabled = enable;
    }

    /// Enable or disable the file sink.
    pub fn set_file_output(&self, enable: bool) {
        self.state.lock().file_enabled = enable;
    }

    /// Path of the open file sink, if any.
    pub fn path(&self) -> Option<PathBuf> {
        self.state.lock().path.clone()
    }

    /// Whether [`Logger::shutdown`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Some(file) = self.state.get_mut().file.as_mut() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn open_logger(dir: &tempfile::TempDir) -> (Logger, BufferConsole, PathBuf) {
        let console = BufferConsole::new();
        let logger = Logger::with_console(console.clone());
        let path = dir.path().join("engine.log");
        logger.initialize(&path).expect("open log file");
        (logger, console, path)
    }

    fn file_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .expect("read log file")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn below_threshold_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, path) = open_logger(&dir);
        logger.set_min_level(LogLevel::Warning);
        logger.debug("hidden");
        logger.info("hidden");
        assert!(console.is_empty());
        assert!(file_lines(&path).is_empty());
    }

    #[test]
    fn at_or_above_threshold_writes_every_enabled_sink() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, path) = open_logger(&dir);
        logger.set_min_level(LogLevel::Warning);
        logger.warning("disk nearly full");
        logger.critical("disk full");

        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, LogLevel::Warning);
        assert!(lines[0].1.contains("[WARNING] disk nearly full"));

        let file = file_lines(&path);
        assert_eq!(file.len(), 2);
        assert!(file[1].contains("[CRITICAL] disk full"));
    }

    #[test]
    fn file_line_carries_timestamp_and_location() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, path) = open_logger(&dir);
        logger.log(
            LogLevel::Info,
            "subsystem ready",
            Some(SourceLocation::new("net.rs", 42)),
        );
        let file = file_lines(&path);
        assert_eq!(file.len(), 1);
        let line = &file[0];
        assert!(line.starts_with('['));
        assert!(line.contains("] [INFO] subsystem ready (net.rs:42)"));
        assert!(!console.lines()[0].1.contains("net.rs:42"));
    }

    #[test]
    fn disabled_sinks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, path) = open_logger(&dir);
        logger.set_console_output(false);
        logger.info("file only");
        logger.set_console_output(true);
        logger.set_file_output(false);
        logger.info("console only");

        assert_eq!(console.len(), 1);
        assert!(console.lines()[0].1.ends_with("console only"));
        let file = file_lines(&path);
        assert_eq!(file.len(), 1);
        assert!(file[0].contains("file only"));
    }

    #[test]
    fn shutdown_is_terminal_and_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, path) = open_logger(&dir);
        logger.info("before");
        logger.shutdown();
        logger.error("after");
        logger.shutdown();

        assert!(logger.is_closed());
        assert_eq!(console.len(), 1);
        assert_eq!(file_lines(&path).len(), 1);
        assert!(matches!(logger.initialize(&path), Err(LoggingError::Closed)));
    }

    #[test]
    fn initialize_fails_for_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::with_console(BufferConsole::new());
        let err = logger
            .initialize(dir.path().join("missing").join("engine.log"))
            .unwrap_err();
        assert!(matches!(err, LoggingError::Open { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_file_write_reports_one_console_error() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let console = BufferConsole::new();
        let logger = Logger::with_console(console.clone());
        logger.initialize(full).expect("open /dev/full");
        logger.set_console_output(false);

        logger.info("hello");

        let lines = console.lines();
        assert_eq!(lines.len(), 1, "console held {:?}", lines);
        assert_eq!(lines[0].0, LogLevel::Error);
        assert!(lines[0].1.contains("[INFO] hello"));
        assert!(lines[0].1.contains("file sink write failed"));
    }

    #[test]
    fn initialize_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.log");
        std::fs::write(&path, "previous run\n").unwrap();
        let logger = Logger::with_console(BufferConsole::new());
        logger.initialize(&path).unwrap();
        logger.info("next run");
        logger.shutdown();
        let lines = file_lines(&path);
        assert_eq!(lines[0], "previous run");
        assert!(lines[1].contains("next run"));
    }

    #[test]
    fn initialize_resets_threshold_to_debug() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::with_console(BufferConsole::new());
        logger.set_min_level(LogLevel::Error);
        logger.initialize(dir.path().join("engine.log")).unwrap();
        assert_eq!(logger.min_level(), LogLevel::Debug);
    }

    #[test]
    fn log_format_fills_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, console, _path) = open_logger(&dir);
        logger.log_format(LogLevel::Info, "x={} y={}", &[&1]);
        assert!(console.lines()[0].1.ends_with("x=1 y={}"));
    }

    #[test]
    fn concurrent_writers_never_interleave_lines() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _console, path) = open_logger(&dir);
        let logger = Arc::new(logger);
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    for n in 0..50 {
                        logger.log_format(LogLevel::Info, "worker {} line {}", &[&worker, &n]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        logger.shutdown();

        let lines = file_lines(&path);
        assert_eq!(lines.len(), 400);
        assert!(lines
            .iter()
            .all(|line| line.contains("[INFO] worker ") && line.contains(" line ")));
    }
}
