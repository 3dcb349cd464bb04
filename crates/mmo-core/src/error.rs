//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Primary orchestration and lifecycle management."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use mmo_logging::LoggingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to initialize engine logger: {0}")]
    Logger(#[from] LoggingError),
    /// Subsystems before `index` stay initialized; nothing is rolled back.
    #[error("subsystem '{name}' (position {index}) failed to initialize: {source}")]
    SubsystemInit {
        index: usize,
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("runtime is not initialized; call initialize() first")]
    NotInitialized,
    #[error("subsystem '{name}' registered after the runtime was initialized")]
    LateRegistration { name: String },
    #[error("target frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f32),
    #[error("another runtime already holds the process slot")]
    AlreadyClaimed,
}
