//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "binary"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Binary entrypoint for the MMO server."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mmo_common::config::EngineConfig;
use mmo_core::{Runtime, StopHandle};
use mmo_logging::LogLevel;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod subsystems;

use subsystems::{FrameLimit, Heartbeat};

const LOG_ENV: &str = "MMO_LOG";
const STOP_RETRY: Duration = Duration::from_millis(50);

type FrameLoop = JoinHandle<(Runtime, mmo_core::Result<()>)>;

#[derive(Debug, Parser)]
#[command(author, version, about = "MMO server", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "HZ", help = "Override the target frame rate")]
    target_fps: Option<f32>,

    #[arg(long, value_name = "FILE", help = "Override the engine log file")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Minimum engine log level (debug..critical)")]
    log_level: Option<LogLevel>,

    #[arg(long, value_name = "N", help = "Stop after N frames")]
    max_frames: Option<u64>,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 10,
        help = "Seconds between heartbeat log lines (0 disables)"
    )]
    heartbeat: u64,

    #[arg(long, value_name = "FILE", help = "Write a frame timing summary as JSON on exit")]
    timing_report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/server.toml"));

    let loaded = EngineConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found; using defaults"),
    }
    if let Some(fps) = cli.target_fps {
        config.runtime.target_fps = fps;
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = file.clone();
    }
    if let Some(level) = cli.log_level {
        config.logging.min_level = level;
    }
    config.validate()?;

    println!("MMO server starting...");
    let mut runtime = Runtime::claim(config)?;
    if cli.heartbeat > 0 {
        runtime.add_subsystem(Heartbeat::every(cli.heartbeat))?;
    }
    if let Some(frames) = cli.max_frames {
        runtime.add_subsystem(FrameLimit::new(frames))?;
    }

    if let Err(err) = runtime.initialize() {
        eprintln!("Failed to initialize engine: {}", err);
        return Err(err).context("engine initialization failed");
    }
    println!("Engine initialized; running at {} Hz", runtime.target_fps());

    let stop = runtime.stop_handle();
    let mut frame_loop = tokio::task::spawn_blocking(move || {
        let result = runtime.run();
        (runtime, result)
    });

    let (mut runtime, result) = tokio::select! {
        joined = &mut frame_loop => joined?,
        signal = signal::ctrl_c() => {
            signal?;
            info!("ctrl-c received; stopping runtime");
            stop_frame_loop(&stop, &mut frame_loop).await?
        }
    };
    result?;

    if let Some(path) = &cli.timing_report {
        if let Err(err) = runtime.timing().histogram().write_json(path) {
            warn!(path = %path.display(), error = %err, "failed to write frame timing report");
        }
    }
    if let Some(fps) = runtime.frame_rate() {
        info!(measured_fps = fps, frames = runtime.timing().frames(), "frame loop summary");
    }
    runtime.shutdown();
    Ok(())
}

/// Request a stop until the frame loop exits.
///
/// `run` raises the running flag on entry, so a stop issued before the
/// blocking task reaches it is repeated.
async fn stop_frame_loop(
    stop: &StopHandle,
    frame_loop: &mut FrameLoop,
) -> Result<(Runtime, mmo_core::Result<()>)> {
    let mut retry = tokio::time::interval(STOP_RETRY);
    loop {
        stop.stop();
        tokio::select! {
            joined = &mut *frame_loop => return Ok(joined?),
            _ = retry.tick() => {}
        }
    }
}

/// Install the tracing subscriber for library diagnostics.
///
/// `MMO_LOG` takes precedence over `RUST_LOG`; the default is `info`.
fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!("invalid {} directive ({}); defaulting to info", LOG_ENV, err);
            EnvFilter::new("info")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
