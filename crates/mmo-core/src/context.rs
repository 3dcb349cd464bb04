//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Primary orchestration and lifecycle management."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mmo_logging::Logger;

/// Cloneable handle that ends the frame loop from any thread.
///
/// The loop checks the flag at the top of each iteration, so an in-flight
/// update and pacing sleep always complete first.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub fn stop(&self) {
        self.set_running(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Services the runtime hands to every subsystem call.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    logger: Arc<Logger>,
    stop: StopHandle,
    target_fps: f32,
}

impl RuntimeContext {
    pub(crate) fn new(logger: Arc<Logger>, stop: StopHandle, target_fps: f32) -> Self {
        Self {
            logger,
            stop,
            target_fps,
        }
    }

    pub(crate) fn set_target_fps(&mut self, target_fps: f32) {
        self.target_fps = target_fps;
    }

    /// Engine logger; safe to clone into worker threads.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Configured loop rate in Hz.
    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    pub fn stop_handle(&self) -> &StopHandle {
        &self.stop
    }

    /// Request the frame loop to end after the current iteration.
    pub fn stop(&self) {
        self.stop.stop();
    }
}
