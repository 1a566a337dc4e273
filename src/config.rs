//! Runtime configuration from the environment.
//!
//! Values are read from process env after loading an optional `.env`:
//!   STEP_CAPTURE_MONITOR       `primary` (default), a zero-based index, or a monitor name
//!   STEP_CAPTURE_TIMEOUT_SECS  caller-side timeout for the CLI, 0 disables (default 120)
//!   STEP_CAPTURE_OUTPUT_DIR    where the CLI writes PNGs (default: Pictures dir)

use std::path::PathBuf;
use std::time::Duration;

pub const MONITOR_VAR: &str = "STEP_CAPTURE_MONITOR";
pub const TIMEOUT_VAR: &str = "STEP_CAPTURE_TIMEOUT_SECS";
pub const OUTPUT_DIR_VAR: &str = "STEP_CAPTURE_OUTPUT_DIR";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which monitor the native backend captures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonitorSelector {
    #[default]
    Primary,
    Index(usize),
    Name(String),
}

impl MonitorSelector {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("primary") {
            return MonitorSelector::Primary;
        }
        match raw.parse::<usize>() {
            Ok(index) => MonitorSelector::Index(index),
            Err(_) => MonitorSelector::Name(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub monitor: MonitorSelector,
    /// `None` means wait indefinitely.
    pub timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorSelector::Primary,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            output_dir: default_output_dir(),
        }
    }
}

impl CaptureConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("[CONFIG] Loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MONITOR_VAR) {
            config.monitor = MonitorSelector::parse(&raw);
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(OUTPUT_DIR_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: OUTPUT_DIR_VAR,
                    value: raw,
                });
            }
            config.output_dir = PathBuf::from(raw);
        }

        Ok(config)
    }
}

fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read .env: {0}")]
    DotEnv(String),
}
