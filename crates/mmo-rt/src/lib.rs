//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Runtime helpers supporting the frame loop."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
//! Frame pacing and loop timing helpers for the engine runtime.

pub mod pacing;
pub mod timing;

pub use pacing::{FramePace, FramePacer};
pub use timing::{FrameTimingReporter, JitterHistogram, JitterSummary};
