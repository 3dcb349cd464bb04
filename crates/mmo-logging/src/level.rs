//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Severity levels and call-site metadata for the engine logger."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity attached to every log call, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostics, emitted only while troubleshooting.
    #[default]
    Debug,
    /// Normal lifecycle information.
    Info,
    /// Something unexpected that the engine recovered from.
    Warning,
    /// An operation failed.
    Error,
    /// The engine cannot continue in its current state.
    Critical,
}

impl LogLevel {
    /// Every level, least severe first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Upper-case label written into every formatted line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Whether console output for this level belongs on the error stream.
    pub fn is_error_stream(&self) -> bool {
        *self >= LogLevel::Warning
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Source position of a log call, usually filled in by the logging macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file as reported by `file!()`.
    pub file: &'static str,
    /// Line as reported by `line!()`.
    pub line: u32,
}

impl SourceLocation {
    /// Build a location from raw file and line values.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
