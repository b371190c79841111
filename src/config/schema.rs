//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the availability monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// HTTP API listener.
    pub listener: ListenerConfig,

    /// The monitored endpoint and probe settings.
    pub target: TargetConfig,

    /// Background check loop.
    pub scheduler: SchedulerConfig,

    /// Check record persistence.
    pub storage: StorageConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Upper bound for a single API request, in seconds.
    /// Must exceed the probe timeout so on-demand checks can finish.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Target endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// URL probed by every check.
    pub url: String,

    /// Per-probe timeout in seconds, covering connect through body read.
    pub timeout_secs: u64,

    /// Value of the User-Agent header sent with each probe.
    pub user_agent: String,

    /// Honour HTTP(S)_PROXY environment settings when probing.
    pub use_system_proxy: bool,
}

impl TargetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: "https://example.com/".to_string(),
            timeout_secs: 5,
            user_agent: concat!("availability-monitor/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: false,
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Run automatic checks in the background.
    pub enabled: bool,

    /// Pause between the end of one automatic check and the start of the next.
    pub interval_secs: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// PostgreSQL connection string. Records are kept in memory when unset.
    pub database_url: Option<String>,

    /// Connection pool size for the PostgreSQL sink.
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    pub acquire_timeout_secs: u64,

    /// Pending records buffered between checks and the sink.
    pub write_queue_capacity: usize,

    /// Records retained by the in-memory sink.
    pub memory_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            acquire_timeout_secs: 5,
            write_queue_capacity: 1024,
            memory_capacity: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Prometheus endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
