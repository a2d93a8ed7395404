//! Session configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use scrapyard_observability::LogFormat;

pub const DATA_VAR: &str = "SCRAPYARD_DATA";
pub const LOG_FORMAT_VAR: &str = "SCRAPYARD_LOG_FORMAT";
pub const MESSAGE_SECS_VAR: &str = "SCRAPYARD_MESSAGE_SECS";
pub const FIRE_RATE_SECS_VAR: &str = "SCRAPYARD_FIRE_RATE_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Game data TOML; built-in items, recipes and pickups when `None`.
    pub data_path: Option<PathBuf>,
    pub log_format: LogFormat,
    /// How long a HUD message stays up.
    pub message_duration: Duration,
    /// Minimum time between two shots.
    pub fire_rate: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            log_format: LogFormat::Pretty,
            message_duration: Duration::from_secs(3),
            fire_rate: Duration::from_millis(300),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_VAR).filter(|p| !p.trim().is_empty()) {
            config.data_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            config.log_format = value.parse().map_err(|e: scrapyard_observability::UnknownLogFormat| {
                ConfigError {
                    var: LOG_FORMAT_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup(MESSAGE_SECS_VAR) {
            config.message_duration = parse_secs(MESSAGE_SECS_VAR, &value)?;
        }

        if let Some(value) = lookup(FIRE_RATE_SECS_VAR) {
            config.fire_rate = parse_secs(FIRE_RATE_SECS_VAR, &value)?;
        }

        Ok(config)
    }
}

fn parse_secs(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a number of seconds"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| invalid("seconds must be a finite, non-negative number"))
}
