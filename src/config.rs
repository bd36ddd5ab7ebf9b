//! Configuration and CLI argument handling

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Focus length used when nothing else is configured
pub const DEFAULT_FOCUS_MINUTES: u64 = 25;
/// Break length used when nothing else is configured
pub const DEFAULT_BREAK_MINUTES: u64 = 5;
/// Longest phase that still fits a signed seconds count
pub const MAX_PHASE_MINUTES: u64 = i64::MAX as u64 / 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("{field} of {minutes} is too long to count down in seconds")]
    TooLong { field: &'static str, minutes: u64 },

    #[error("failed to read timer config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "focus-timer")]
#[command(about = "A focus/break countdown timer server for dashboard widgets")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON timer config file with focusMinutes/breakMinutes
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Focus phase length in minutes, overrides the config file
    #[arg(short, long)]
    pub focus_minutes: Option<u64>,

    /// Break phase length in minutes, overrides the config file
    #[arg(short, long)]
    pub break_minutes: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the timer config: CLI flags, then the config file, then defaults
    pub fn timer_config(&self) -> Result<TimerConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => TimerConfig::load(path)?,
            None => TimerConfig::default(),
        };

        TimerConfig::new(
            self.focus_minutes.unwrap_or(base.focus_minutes),
            self.break_minutes.unwrap_or(base.break_minutes),
        )
    }
}

/// Focus and break lengths, fixed for the lifetime of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    pub focus_minutes: u64,
    pub break_minutes: u64,
}

impl TimerConfig {
    pub fn new(focus_minutes: u64, break_minutes: u64) -> Result<Self, ConfigError> {
        if focus_minutes == 0 {
            return Err(ConfigError::NonPositive { field: "focusMinutes" });
        }
        if break_minutes == 0 {
            return Err(ConfigError::NonPositive { field: "breakMinutes" });
        }
        if focus_minutes > MAX_PHASE_MINUTES {
            return Err(ConfigError::TooLong { field: "focusMinutes", minutes: focus_minutes });
        }
        if break_minutes > MAX_PHASE_MINUTES {
            return Err(ConfigError::TooLong { field: "breakMinutes", minutes: break_minutes });
        }
        Ok(Self {
            focus_minutes,
            break_minutes,
        })
    }

    /// Load a JSON timer config.
    ///
    /// A missing file is an error. A file that does not parse, or that
    /// holds out-of-range values, falls back to the defaults with a warning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = serde_json::from_str::<TimerConfig>(&data)
            .map_err(|e| e.to_string())
            .and_then(|c| TimerConfig::new(c.focus_minutes, c.break_minutes).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => {
                info!("Loaded timer config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse timer config {}, using defaults: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    // Saturating: the fields are public, so a struct literal can skip `new`
    pub fn focus_seconds(&self) -> u64 {
        self.focus_minutes.saturating_mul(60)
    }

    pub fn break_seconds(&self) -> u64 {
        self.break_minutes.saturating_mul(60)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}
