//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Primary orchestration and lifecycle management."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
//! Core runtime for the MMO engine.
//!
//! A [`Runtime`] owns an ordered set of [`Subsystem`]s and the engine
//! [`Logger`](mmo_logging::Logger). It drives them through
//! initialize → frame loop → shutdown.

pub mod context;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod subsystem;

pub use context::{RuntimeContext, StopHandle};
pub use error::{Result, RuntimeError};
pub use registry::SubsystemRegistry;
pub use runtime::Runtime;
pub use subsystem::Subsystem;
