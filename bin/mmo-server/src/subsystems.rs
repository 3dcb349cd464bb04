//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "binary"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Built-in server subsystems wired up from the command line."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::time::Duration;

use mmo_core::{RuntimeContext, Subsystem};
use mmo_logging::{mmo_info, mmo_warning};

/// Periodically logs uptime and frame count to the engine log.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    since_last: Duration,
    uptime: Duration,
    frames: u64,
}

impl Heartbeat {
    pub fn every(seconds: u64) -> Self {
        Self {
            interval: Duration::from_secs(seconds),
            since_last: Duration::ZERO,
            uptime: Duration::ZERO,
            frames: 0,
        }
    }
}

impl Subsystem for Heartbeat {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn initialize(&mut self, ctx: &RuntimeContext) -> anyhow::Result<()> {
        mmo_info!(ctx.logger(), "heartbeat every {}s", self.interval.as_secs());
        Ok(())
    }

    fn update(&mut self, ctx: &RuntimeContext, delta_time: f32) {
        let delta = Duration::from_secs_f32(delta_time.max(0.0));
        self.frames += 1;
        self.uptime += delta;
        self.since_last += delta;
        if self.since_last >= self.interval {
            self.since_last = Duration::ZERO;
            mmo_info!(
                ctx.logger(),
                "uptime {}s, {} frames",
                self.uptime.as_secs(),
                self.frames
            );
        }
    }

    fn shutdown(&mut self, ctx: &RuntimeContext) {
        mmo_info!(ctx.logger(), "heartbeat stopped after {} frames", self.frames);
    }
}

/// Stops the runtime after a fixed number of frames.
#[derive(Debug)]
pub struct FrameLimit {
    limit: u64,
    frames: u64,
}

impl FrameLimit {
    pub fn new(limit: u64) -> Self {
        Self { limit, frames: 0 }
    }
}

impl Subsystem for FrameLimit {
    fn name(&self) -> &str {
        "frame-limit"
    }

    fn initialize(&mut self, ctx: &RuntimeContext) -> anyhow::Result<()> {
        if self.limit == 0 {
            mmo_warning!(ctx.logger(), "frame limit of 0 still runs one frame");
        }
        Ok(())
    }

    fn update(&mut self, ctx: &RuntimeContext, _delta_time: f32) {
        self.frames += 1;
        if self.frames >= self.limit {
            mmo_info!(ctx.logger(), "frame limit {} reached; stopping", self.limit);
            ctx.stop();
        }
    }

    fn shutdown(&mut self, _ctx: &RuntimeContext) {}
}
