//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Console sinks for the engine logger."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::LogLevel;

/// Destination for console-formatted log lines.
///
/// The logger serialises every call behind its own mutex, so implementations
/// never see concurrent writes.
pub trait ConsoleSink: Send {
    /// Write one already formatted line. `level` selects the stream.
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()>;
}

/// Process console: stdout for Debug/Info, stderr for Warning and above.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl ConsoleSink for StdConsole {
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()> {
        if level.is_error_stream() {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{}", line)
        } else {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", line)
        }
    }
}

/// In-memory console that keeps every line, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl BufferConsole {
    /// Create an empty buffer. Clones share the same storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines with their level.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Number of captured lines.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing was captured yet.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drop every captured line.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl ConsoleSink for BufferConsole {
    fn write_line(&mut self, level: LogLevel, line: &str) -> io::Result<()> {
        self.lines.lock().push((level, line.to_owned()));
        Ok(())
    }
}
