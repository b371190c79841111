//! Result of a single probe.

use std::time::Instant;

use crate::stats::round2;

/// What happened when the target was probed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The target answered and its body was read to the end.
    Response(ProbeResponse),
    /// The request never produced a complete response.
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    /// Total elapsed time, reported on both paths.
    pub fn latency_ms(&self) -> f64 {
        match self {
            ProbeOutcome::Response(r) => r.latency_ms,
            ProbeOutcome::Failed(f) => f.latency_ms,
        }
    }

    /// True when a response arrived and its status indicates success.
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeOutcome::Response(r) if r.ok)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status_code: u16,
    /// Status below 400.
    pub ok: bool,
    pub ttfb_ms: f64,
    pub latency_ms: f64,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFailure {
    pub latency_ms: f64,
    /// Never empty.
    pub error: String,
}

/// Milliseconds since `start`, rounded to 2 decimals.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    round2(start.elapsed().as_secs_f64() * 1000.0)
}
