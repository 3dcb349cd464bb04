//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Shared primitives and utilities for the core runtime."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
//! Shared primitives for the MMO engine workspace: configuration loading and
//! clock helpers consumed by the runtime and the server binary.

pub mod config;
pub mod time;

pub use config::{EngineConfig, LoadedEngineConfig, LoggingConfig, RuntimeConfig};
