//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the target URL is absolute http(s)
//! - Validate value ranges (timeouts > 0, capacities > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target.url must not be empty")]
    EmptyTargetUrl,

    #[error("target.url '{url}' is not a valid URL: {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("target.url scheme '{0}' is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("listener.request_timeout_secs ({request}) must exceed target.timeout_secs ({probe})")]
    RequestTimeoutTooShort { request: u64, probe: u64 },

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let raw_url = config.target.url.trim();
    if raw_url.is_empty() {
        errors.push(ValidationError::EmptyTargetUrl);
    } else {
        match Url::parse(raw_url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidTargetUrl {
                url: raw_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if config.target.timeout_secs == 0 {
        errors.push(ValidationError::Zero("target.timeout_secs"));
    }
    if config.scheduler.interval_secs == 0 {
        errors.push(ValidationError::Zero("scheduler.interval_secs"));
    }
    if config.storage.write_queue_capacity == 0 {
        errors.push(ValidationError::Zero("storage.write_queue_capacity"));
    }
    if config.storage.memory_capacity == 0 {
        errors.push(ValidationError::Zero("storage.memory_capacity"));
    }
    if config.storage.database_url.is_some() && config.storage.max_connections == 0 {
        errors.push(ValidationError::Zero("storage.max_connections"));
    }

    if config.listener.request_timeout_secs <= config.target.timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.listener.request_timeout_secs,
            probe: config.target.timeout_secs,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
