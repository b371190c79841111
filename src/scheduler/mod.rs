//! Automatic checks.
//!
//! # Responsibilities
//! - Run one `auto` check, then wait the configured interval, forever
//! - Stop cleanly when shutdown is broadcast
//!
//! # Design Decisions
//! - Strictly sequential: the wait starts after a check finishes, so a slow
//!   probe delays the next tick instead of overlapping it
//! - Shutdown is only observed between checks; an in-flight check completes

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::check::{CheckRunner, CheckSource};

pub struct Scheduler {
    runner: Arc<CheckRunner>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(runner: Arc<CheckRunner>, interval: Duration) -> Self {
        Self { runner, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            target = %self.runner.target_url(),
            "Scheduler starting"
        );

        loop {
            // Response is discarded; the stats update and record are the effect.
            let _ = self.runner.run_check(CheckSource::Auto).await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::probe::ProbeExecutor;
    use crate::stats::StatsAggregator;
    use crate::storage::{MemoryRecordSink, RecordWriter};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_first_check_runs_immediately_and_shutdown_stops_loop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = Arc::new(MemoryRecordSink::new(10));
        let (writer, _task) = RecordWriter::spawn(sink.clone(), 8);
        let runner = Arc::new(CheckRunner::new(
            format!("http://{}/", addr),
            Duration::from_secs(1),
            ProbeExecutor::new(&TargetConfig::default()).unwrap(),
            Arc::new(StatsAggregator::new()),
            writer.clone(),
        ));

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(Scheduler::new(runner.clone(), Duration::from_secs(3600)).run(rx));

        // Wait for the first auto check without waiting for a tick.
        for _ in 0..100 {
            if runner.stats().snapshot().total_checks > 0 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(runner.stats().snapshot().total_checks, 1);

        tx.send(()).unwrap();
        time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();

        writer.flush().await;
        assert_eq!(sink.len(), 1);
    }
}
