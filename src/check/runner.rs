//! A single check cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::check::record::{CheckRecord, CheckResponse, CheckSource};
use crate::observability::metrics;
use crate::probe::{ProbeExecutor, ProbeOutcome};
use crate::stats::StatsAggregator;
use crate::storage::RecordWriter;

/// Runs checks against the configured target.
///
/// Shared by the scheduler and the API; `source` is the only difference
/// between the two paths.
#[derive(Debug)]
pub struct CheckRunner {
    target_url: String,
    timeout: Duration,
    probe: ProbeExecutor,
    stats: Arc<StatsAggregator>,
    writer: RecordWriter,
}

impl CheckRunner {
    pub fn new(
        target_url: impl Into<String>,
        timeout: Duration,
        probe: ProbeExecutor,
        stats: Arc<StatsAggregator>,
        writer: RecordWriter,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            timeout,
            probe,
            stats,
            writer,
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    /// Probe the target once, count the result and queue the record.
    ///
    /// Never fails: transport errors are reported in the response and
    /// persistence happens off the response path.
    pub async fn run_check(&self, source: CheckSource) -> CheckResponse {
        let timestamp = Utc::now();
        let outcome = self.probe.probe(&self.target_url, self.timeout).await;

        let stats = self.stats.record(outcome.is_ok());

        let record = CheckRecord::from_outcome(
            timestamp,
            &self.target_url,
            &outcome,
            stats.consecutive_failures,
            source,
        );

        metrics::record_check(source, outcome.is_ok(), outcome.latency_ms());
        metrics::record_streak(stats.consecutive_failures);

        match &outcome {
            ProbeOutcome::Response(r) if r.ok => tracing::info!(
                source = %source,
                status = r.status_code,
                latency_ms = r.latency_ms,
                ttfb_ms = r.ttfb_ms,
                "Check succeeded"
            ),
            ProbeOutcome::Response(r) => tracing::warn!(
                source = %source,
                status = r.status_code,
                latency_ms = r.latency_ms,
                consecutive_failures = stats.consecutive_failures,
                "Check failed: non-success status"
            ),
            ProbeOutcome::Failed(f) => tracing::warn!(
                source = %source,
                error = %f.error,
                latency_ms = f.latency_ms,
                consecutive_failures = stats.consecutive_failures,
                "Check failed: transport error"
            ),
        }

        self.writer.submit(record);

        CheckResponse::new(&self.target_url, &outcome, &stats, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::storage::{MemoryRecordSink, RecordSink};
    use tokio::net::TcpListener;

    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_failed_check_is_counted_and_persisted() {
        let sink = Arc::new(MemoryRecordSink::new(100));
        let (writer, _task) = RecordWriter::spawn(sink.clone(), 16);
        let stats = Arc::new(StatsAggregator::new());
        let url = closed_port_url().await;
        let runner = CheckRunner::new(
            url.clone(),
            Duration::from_secs(2),
            ProbeExecutor::new(&TargetConfig::default()).unwrap(),
            stats.clone(),
            writer.clone(),
        );

        let first = runner.run_check(CheckSource::Manual).await;
        let second = runner.run_check(CheckSource::Auto).await;

        assert!(!first.available);
        assert_eq!(first.consecutive_failures, 1);
        assert_eq!(second.consecutive_failures, 2);
        assert_eq!(second.availability_pct_since_start, Some(0.0));
        assert!(second.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert_eq!(stats.snapshot().total_checks, 2);

        writer.flush().await;
        let records = sink.get_last(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, CheckSource::Manual);
        assert_eq!(records[1].source, CheckSource::Auto);
        assert_eq!(records[1].consecutive_failures, 2);
        assert!(records.iter().all(|r| r.url == url && r.status_code.is_none()));
    }
}
