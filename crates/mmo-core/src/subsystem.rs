//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Contract implemented by pluggable engine subsystems."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::any::Any;

use crate::context::RuntimeContext;

/// A pluggable unit driven by the [`Runtime`](crate::Runtime) once per frame.
///
/// Subsystems are initialized in registration order, updated in registration
/// order every frame, and shut down in reverse registration order.
pub trait Subsystem: AsAny + Send {
    /// Display name used in lifecycle log lines.
    fn name(&self) -> &str;

    /// Prepare the subsystem. An error aborts runtime initialization.
    fn initialize(&mut self, ctx: &RuntimeContext) -> anyhow::Result<()>;

    /// Advance one frame. `delta_time` is the measured time in seconds since
    /// the previous frame started.
    fn update(&mut self, ctx: &RuntimeContext, delta_time: f32);

    /// Release resources. Called once, after every later-registered
    /// subsystem has shut down.
    fn shutdown(&mut self, ctx: &RuntimeContext);
}

/// Upcast helper so the registry can downcast to the concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
