//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_checks_total` (counter): checks by source, outcome
//! - `monitor_check_latency_seconds` (histogram): probe latency by source
//! - `monitor_consecutive_failures` (gauge): current failure streak
//! - `monitor_records_dropped_total` (counter): records not persisted, by reason

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::check::CheckSource;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_check(source: CheckSource, ok: bool, latency_ms: f64) {
    let outcome = if ok { "ok" } else { "failed" };
    metrics::counter!(
        "monitor_checks_total",
        "source" => source.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("monitor_check_latency_seconds", "source" => source.as_str())
        .record(latency_ms / 1000.0);
}

pub fn record_streak(consecutive_failures: u64) {
    metrics::gauge!("monitor_consecutive_failures").set(consecutive_failures as f64);
}

pub fn record_dropped(reason: &'static str) {
    metrics::counter!("monitor_records_dropped_total", "reason" => reason).increment(1);
}
