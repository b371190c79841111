//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect and prepare the record sink
//! - Start the record writer
//! - Build the shared check runner
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listeners and the scheduler start after this returns (in main)

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::check::CheckRunner;
use crate::config::MonitorConfig;
use crate::http::AppState;
use crate::probe::{ProbeError, ProbeExecutor};
use crate::stats::StatsAggregator;
use crate::storage::{self, RecordSink, RecordWriter, StorageError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Storage initialization failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Probe initialization failed: {0}")]
    Probe(#[from] ProbeError),
}

/// Everything the server and scheduler share.
pub struct Services {
    pub runner: Arc<CheckRunner>,
    pub sink: Arc<dyn RecordSink>,
    pub writer: RecordWriter,
    pub writer_task: JoinHandle<()>,
}

impl Services {
    pub fn app_state(&self) -> AppState {
        AppState {
            runner: self.runner.clone(),
            sink: self.sink.clone(),
        }
    }
}

/// Connect the configured sink and wire up the check path.
pub async fn initialize(config: &MonitorConfig) -> Result<Services, StartupError> {
    let sink = storage::connect(&config.storage).await?;
    sink.init().await?;
    initialize_with_sink(config, sink)
}

/// Wire up the check path around an already prepared sink.
pub fn initialize_with_sink(
    config: &MonitorConfig,
    sink: Arc<dyn RecordSink>,
) -> Result<Services, StartupError> {
    let probe = ProbeExecutor::new(&config.target)?;
    let (writer, writer_task) = RecordWriter::spawn(sink.clone(), config.storage.write_queue_capacity);

    let runner = Arc::new(CheckRunner::new(
        config.target.url.trim(),
        config.target.timeout(),
        probe,
        Arc::new(StatsAggregator::new()),
        writer.clone(),
    ));

    tracing::info!(
        target = %runner.target_url(),
        timeout_secs = config.target.timeout_secs,
        "Check runner ready"
    );

    Ok(Services {
        runner,
        sink,
        writer,
        writer_task,
    })
}
