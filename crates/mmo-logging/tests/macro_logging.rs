//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "integration-tests"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Call-site macro behaviour against a real log file."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::sync::Arc;

use mmo_logging::{mmo_debug, mmo_error, mmo_info, BufferConsole, LogLevel, Logger};

#[test]
fn macros_tag_lines_with_call_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engine.log");
    let console = BufferConsole::new();
    let logger = Arc::new(Logger::with_console(console.clone()));
    logger.initialize(&path).expect("open log");

    mmo_info!(logger, "zone {} has {} players", "harbor", 12);
    mmo_error!(logger, "lost connection to {}", "db-1");
    logger.shutdown();

    let contents = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[INFO] zone harbor has 12 players (tests/macro_logging.rs:"));
    assert!(lines[1].contains("[ERROR] lost connection to db-1"));

    let console_lines = console.lines();
    assert_eq!(console_lines[1].0, LogLevel::Error);
}

#[test]
fn macros_respect_threshold_and_template_rules() {
    let console = BufferConsole::new();
    let logger = Logger::with_console(console.clone());
    logger.set_min_level(LogLevel::Info);

    mmo_debug!(logger, "suppressed {}", 1);
    mmo_info!(logger, "x={} y={}", 1);
    mmo_info!(logger, "plain message");

    let lines = console.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].1.ends_with("x=1 y={}"));
    assert!(lines[1].1.ends_with("plain message"));
}
