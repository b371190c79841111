//! Check records and API payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::probe::ProbeOutcome;
use crate::stats::RunningStats;

/// What triggered a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSource {
    /// On-demand request through the API.
    Manual,
    /// The background scheduler.
    Auto,
}

impl CheckSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckSource::Manual => "manual",
            CheckSource::Auto => "auto",
        }
    }
}

impl fmt::Display for CheckSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(CheckSource::Manual),
            "auto" => Ok(CheckSource::Auto),
            other => Err(format!("unknown check source '{}'", other)),
        }
    }
}

/// One persisted observation of the target.
///
/// Either `status_code`, `ttfb_ms` and `response_size_bytes` are all set and
/// `error` is empty, or all three are `None` and `error` describes the
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRecord {
    #[serde(rename = "ts_iso", serialize_with = "serialize_ts_iso")]
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub status_code: Option<u16>,
    pub ok: bool,
    pub latency_ms: Option<f64>,
    pub ttfb_ms: Option<f64>,
    pub response_size_bytes: Option<u64>,
    pub consecutive_failures: u64,
    pub source: CheckSource,
    pub error: String,
}

impl CheckRecord {
    /// Build the record for a finished probe.
    ///
    /// `consecutive_failures` must be the streak after this check was counted.
    pub fn from_outcome(
        timestamp: DateTime<Utc>,
        url: &str,
        outcome: &ProbeOutcome,
        consecutive_failures: u64,
        source: CheckSource,
    ) -> Self {
        match outcome {
            ProbeOutcome::Response(response) => Self {
                timestamp,
                url: url.to_string(),
                status_code: Some(response.status_code),
                ok: response.ok,
                latency_ms: Some(response.latency_ms),
                ttfb_ms: Some(response.ttfb_ms),
                response_size_bytes: Some(response.size_bytes),
                consecutive_failures,
                source,
                error: String::new(),
            },
            ProbeOutcome::Failed(failure) => Self {
                timestamp,
                url: url.to_string(),
                status_code: None,
                ok: false,
                latency_ms: Some(failure.latency_ms),
                ttfb_ms: None,
                response_size_bytes: None,
                consecutive_failures,
                source,
                error: failure.error.clone(),
            },
        }
    }
}

/// Whole-second UTC timestamp with a trailing `Z`.
fn serialize_ts_iso<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format("%Y-%m-%dT%H:%M:%SZ"))
}

/// Payload returned to whoever triggered a check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResponse {
    pub url: String,
    pub status_code: Option<u16>,
    pub available: bool,
    pub latency_ms: f64,
    pub ttfb_ms: Option<f64>,
    pub response_size_bytes: Option<u64>,
    pub consecutive_failures: u64,
    pub availability_pct_since_start: Option<f64>,
    pub source: CheckSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResponse {
    pub fn new(url: &str, outcome: &ProbeOutcome, stats: &RunningStats, source: CheckSource) -> Self {
        let (status_code, ttfb_ms, response_size_bytes, error) = match outcome {
            ProbeOutcome::Response(r) => (Some(r.status_code), Some(r.ttfb_ms), Some(r.size_bytes), None),
            ProbeOutcome::Failed(f) => (None, None, None, Some(f.error.clone())),
        };

        Self {
            url: url.to_string(),
            status_code,
            available: outcome.is_ok(),
            latency_ms: outcome.latency_ms(),
            ttfb_ms,
            response_size_bytes,
            consecutive_failures: stats.consecutive_failures,
            availability_pct_since_start: stats.availability_pct(),
            source,
            error,
        }
    }
}
