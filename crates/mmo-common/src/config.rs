//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Shared primitives and utilities for the core runtime."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use mmo_logging::{LogLevel, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time::frame_budget;

fn default_target_fps() -> f32 {
    60.0
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_true() -> bool {
    true
}

/// Primary configuration object for the engine runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`EngineConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedEngineConfig {
    pub config: EngineConfig,
    /// `None` when no file was found and built-in defaults were used.
    pub source: Option<PathBuf>,
}

impl EngineConfig {
    pub const ENV_CONFIG_PATH: &'static str = "MMO_CONFIG";

    /// Load configuration from disk, respecting the `MMO_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// An explicit `MMO_CONFIG` path must exist. Otherwise the first existing
    /// candidate wins, falling back to defaults when none exists.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedEngineConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedEngineConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedEngineConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!(
            inspected = candidates.len(),
            "no configuration file found; using defaults"
        );
        Ok(LoadedEngineConfig {
            config: Self::default(),
            source: None,
        })
    }

    /// Read and validate a single TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<EngineConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.runtime.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for EngineConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: EngineConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Frame loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Target update rate in Hz.
    #[serde(default = "default_target_fps")]
    pub target_fps: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        self.frame_budget().map(|_| ())
    }

    /// Frame interval implied by `target_fps`.
    pub fn frame_budget(&self) -> Result<Duration> {
        frame_budget(self.target_fps).ok_or_else(|| {
            anyhow!(
                "runtime.target_fps must be a positive number with a representable frame interval, got {}",
                self.target_fps
            )
        })
    }
}

/// Diagnostic logger settings applied when the runtime initializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append-mode log file.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub min_level: LogLevel,
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default = "default_true")]
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            min_level: LogLevel::Debug,
            console: true,
            file_output: true,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            return Err(anyhow!("logging.file must not be empty"));
        }
        Ok(())
    }
}
