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
use std::time::Duration;

use mmo_common::config::EngineConfig;
use mmo_common::time::{duration_to_micros, frame_budget, unix_time_secs};
use mmo_logging::Logger;
use mmo_rt::{FramePacer, FrameTimingReporter, JitterSummary};
use tracing::{debug, error, info, warn};

use crate::context::{RuntimeContext, StopHandle};
use crate::error::{Result, RuntimeError};
use crate::registry::SubsystemRegistry;
use crate::subsystem::Subsystem;

/// Set while a runtime obtained through [`Runtime::claim`] is alive.
static PROCESS_SLOT: AtomicBool = AtomicBool::new(false);

/// Primary engine entrypoint: owns the logger, the subsystems, and the
/// frame loop.
#[derive(Debug)]
pub struct Runtime {
    config: EngineConfig,
    budget: Duration,
    initialized: bool,
    stop: StopHandle,
    context: Option<RuntimeContext>,
    registry: SubsystemRegistry,
    timing: FrameTimingReporter,
    claimed: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        let config = EngineConfig::default();
        let budget = frame_budget(config.runtime.target_fps).unwrap_or_default();
        Self::build(config, budget)
    }
}

impl Runtime {
    /// Runtime with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime with an explicit configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let budget = validate_fps(config.runtime.target_fps)?;
        Ok(Self::build(config, budget))
    }

    /// Construct the process-wide runtime.
    ///
    /// At most one claimed runtime is alive per process. Concurrent claims
    /// race on an atomic flag, so exactly one wins. The slot frees when the
    /// winner is dropped.
    pub fn claim(config: EngineConfig) -> Result<Self> {
        let budget = validate_fps(config.runtime.target_fps)?;
        PROCESS_SLOT
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RuntimeError::AlreadyClaimed)?;
        let mut runtime = Self::build(config, budget);
        runtime.claimed = true;
        debug!("process runtime slot claimed");
        Ok(runtime)
    }

    fn build(config: EngineConfig, budget: Duration) -> Self {
        Self {
            config,
            budget,
            initialized: false,
            stop: StopHandle::default(),
            context: None,
            registry: SubsystemRegistry::new(),
            timing: FrameTimingReporter::new(budget),
            claimed: false,
        }
    }

    /// Register a subsystem and return it for immediate configuration.
    ///
    /// Registration is only valid before [`initialize`](Self::initialize)
    /// succeeds; later calls are rejected.
    pub fn add_subsystem<T: Subsystem>(&mut self, subsystem: T) -> Result<&mut T> {
        if self.initialized {
            let name = subsystem.name().to_owned();
            warn!(subsystem = %name, "rejected subsystem registration after initialize");
            return Err(RuntimeError::LateRegistration { name });
        }
        debug!(subsystem = %subsystem.name(), position = self.registry.len(), "subsystem registered");
        Ok(self.registry.push(subsystem))
    }

    /// First registered subsystem of type `T`.
    pub fn get_subsystem<T: Subsystem>(&self) -> Option<&T> {
        self.registry.first::<T>()
    }

    pub fn get_subsystem_mut<T: Subsystem>(&mut self) -> Option<&mut T> {
        self.registry.first_mut::<T>()
    }

    pub fn subsystem_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn subsystem_count(&self) -> usize {
        self.registry.len()
    }

    /// Bring up the logger, then every subsystem in registration order.
    ///
    /// Returns immediately if already initialized. On a subsystem failure the
    /// remaining subsystems are skipped and the ones already initialized are
    /// left as they are.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        info!(subsystems = self.registry.len(), "initializing runtime");
        if let Some(previous) = self.context.take() {
            previous.logger().shutdown();
        }

        let logging = &self.config.logging;
        let logger = Arc::new(Logger::new());
        if let Err(err) = logger.initialize(&logging.file) {
            error!(path = %logging.file.display(), error = %err, "failed to initialize engine logger");
            return Err(err.into());
        }
        logger.set_min_level(logging.min_level);
        logger.set_console_output(logging.console);
        logger.set_file_output(logging.file_output);

        let ctx = RuntimeContext::new(
            logger.clone(),
            self.stop.clone(),
            self.config.runtime.target_fps,
        );
        self.context = Some(ctx.clone());
        logger.info("Runtime initialization started");

        for (index, entry) in self.registry.iter_mut().enumerate() {
            let name = entry.name().to_owned();
            if let Err(source) = entry.subsystem_mut().initialize(&ctx) {
                logger.error(&format!("Subsystem '{}' failed to initialize: {:#}", name, source));
                error!(subsystem = %name, position = index, error = %source, "subsystem initialization failed");
                return Err(RuntimeError::SubsystemInit {
                    index,
                    name,
                    source,
                });
            }
            logger.info(&format!("Subsystem '{}' initialized", name));
        }

        self.initialized = true;
        logger.info("Runtime initialization complete");
        Ok(())
    }

    /// Drive the frame loop until [`stop`](Self::stop) is requested.
    ///
    /// Each iteration measures the time since the previous one started,
    /// updates every subsystem in order, and sleeps out whatever the
    /// iteration left of the frame budget.
    pub fn run(&mut self) -> Result<()> {
        let ctx = match (&self.context, self.initialized) {
            (Some(ctx), true) => ctx.clone(),
            _ => {
                error!("runtime is not initialized; call initialize() first");
                return Err(RuntimeError::NotInitialized);
            }
        };

        self.stop.set_running(true);
        self.timing.restart(self.budget);
        ctx.logger().info("Runtime loop started");
        info!(
            target_fps = self.config.runtime.target_fps,
            budget_us = duration_to_micros(self.timing.target_interval()),
            "runtime loop started"
        );

        let mut pacer = FramePacer::new(self.budget);

        while self.stop.is_running() {
            let delta_time = pacer.begin_frame().as_secs_f32();
            self.timing.record_tick();

            for entry in self.registry.iter_mut() {
                entry.subsystem_mut().update(&ctx, delta_time);
            }

            pacer.end_frame();
        }

        ctx.logger().info("Runtime loop stopped");
        info!(frames = self.timing.frames(), "runtime loop stopped");
        Ok(())
    }

    /// Shut subsystems down in reverse registration order, then the logger.
    /// No-op unless initialized.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        let Some(ctx) = self.context.take() else {
            self.initialized = false;
            return;
        };
        let logger = ctx.logger().clone();
        logger.info("Runtime shutting down");
        self.stop.stop();

        for entry in self.registry.iter_mut().rev() {
            entry.subsystem_mut().shutdown(&ctx);
            logger.info(&format!("Subsystem '{}' shut down", entry.name()));
        }
        self.registry.clear();

        logger.info("Runtime shutdown complete");
        logger.shutdown();
        self.initialized = false;
        info!("runtime shutdown complete");
    }

    /// Request the frame loop to end at the top of its next iteration.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Handle that can stop the loop from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_running()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Engine logger, present from initialization until shutdown.
    pub fn logger(&self) -> Option<Arc<Logger>> {
        self.context.as_ref().map(|ctx| ctx.logger().clone())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn target_fps(&self) -> f32 {
        self.config.runtime.target_fps
    }

    /// Change the frame rate used by the next [`run`](Self::run).
    pub fn set_target_fps(&mut self, fps: f32) -> Result<()> {
        self.budget = validate_fps(fps)?;
        self.config.runtime.target_fps = fps;
        if let Some(ctx) = self.context.as_mut() {
            ctx.set_target_fps(fps);
        }
        Ok(())
    }

    /// Configured frame interval in seconds.
    ///
    /// This is the fixed budget `1 / target_fps`, not the measured delta
    /// passed to [`Subsystem::update`].
    pub fn delta_time(&self) -> f32 {
        1.0 / self.config.runtime.target_fps
    }

    /// Wall-clock seconds since the Unix epoch.
    pub fn time(&self) -> f64 {
        unix_time_secs()
    }

    /// Measured frames per second over the most recent frames.
    pub fn frame_rate(&self) -> Option<f64> {
        self.timing.frame_rate()
    }

    /// Jitter of frame spacing against the budget.
    pub fn frame_timing(&self) -> Option<JitterSummary> {
        self.timing.histogram().summary()
    }

    pub fn timing(&self) -> &FrameTimingReporter {
        &self.timing
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
        if self.claimed {
            PROCESS_SLOT.store(false, Ordering::Release);
            debug!("process runtime slot released");
        }
    }
}

/// Frame budget for `fps`, or `InvalidFrameRate` when it has none.
fn validate_fps(fps: f32) -> Result<Duration> {
    frame_budget(fps).ok_or(RuntimeError::InvalidFrameRate(fps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_time_is_fixed_budget() {
        let mut runtime = Runtime::new();
        assert_eq!(runtime.target_fps(), 60.0);
        runtime.set_target_fps(10.0).unwrap();
        assert!((runtime.delta_time() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_invalid_frame_rates() {
        let mut runtime = Runtime::new();
        assert!(matches!(
            runtime.set_target_fps(0.0),
            Err(RuntimeError::InvalidFrameRate(_))
        ));
        assert!(runtime.set_target_fps(f32::NAN).is_err());
        assert!(runtime.set_target_fps(-30.0).is_err());
        assert_eq!(runtime.target_fps(), 60.0);

        let mut config = EngineConfig::default();
        config.runtime.target_fps = f32::INFINITY;
        assert!(Runtime::with_config(config).is_err());
    }

    #[test]
    fn rejects_rates_without_a_frame_interval() {
        let mut config = EngineConfig::default();
        config.runtime.target_fps = 1e-20;
        assert!(matches!(
            Runtime::with_config(config),
            Err(RuntimeError::InvalidFrameRate(_))
        ));

        let mut runtime = Runtime::new();
        assert!(matches!(
            runtime.set_target_fps(1e-20),
            Err(RuntimeError::InvalidFrameRate(_))
        ));
        assert_eq!(runtime.target_fps(), 60.0);
    }

    #[test]
    fn set_target_fps_updates_config() {
        let mut runtime = Runtime::new();
        runtime.set_target_fps(25.0).unwrap();
        assert_eq!(runtime.config().runtime.target_fps, 25.0);
        assert_eq!(runtime.target_fps(), 25.0);
    }

    #[test]
    fn run_before_initialize_is_reported() {
        let mut runtime = Runtime::new();
        assert!(matches!(runtime.run(), Err(RuntimeError::NotInitialized)));
        assert!(!runtime.is_running());
    }

    #[test]
    fn shutdown_without_initialize_is_noop() {
        let mut runtime = Runtime::new();
        runtime.shutdown();
        runtime.shutdown();
        assert!(!runtime.is_initialized());
        assert!(runtime.logger().is_none());
    }

    #[test]
    fn time_is_wall_clock() {
        let runtime = Runtime::new();
        assert!(runtime.time() > 1_577_836_800.0);
    }
}
