//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{LogFormat, MonitorConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Starts from defaults, merges the TOML file at `path` when given, then
/// applies environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => MonitorConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` resolves a variable name to its value, which keeps this testable
/// without touching the real process environment.
pub fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("TARGET_URL") {
        config.target.url = url;
    }
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
        config.storage.database_url = Some(url);
    }
    if let Some(addr) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(value) = lookup("CHECK_INTERVAL_SECS") {
        config.scheduler.interval_secs = parse_var("CHECK_INTERVAL_SECS", value)?;
    }
    if let Some(value) = lookup("PROBE_TIMEOUT_SECS") {
        config.target.timeout_secs = parse_var("PROBE_TIMEOUT_SECS", value)?;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(value) = lookup("LOG_FORMAT") {
        config.observability.log_format = parse_var::<LogFormat>("LOG_FORMAT", value)?;
    }
    if let Some(addr) = lookup("METRICS_ADDRESS") {
        config.observability.metrics_address = addr;
        config.observability.metrics_enabled = true;
    }
    Ok(())
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Env {
        var,
        reason: e.to_string(),
        value,
    })
}
