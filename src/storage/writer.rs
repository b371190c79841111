//! Background record writer.
//!
//! # Responsibilities
//! - Accept records from checks without waiting on the sink
//! - Hand them to the sink one at a time, in submission order
//! - Report sink failures through logs and metrics
//!
//! # Design Decisions
//! - Bounded queue: when full, the newest record is dropped
//! - `flush` rides the same queue, so it observes every earlier submit

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::check::CheckRecord;
use crate::observability::metrics;
use crate::storage::RecordSink;

#[derive(Debug)]
enum WriteCommand {
    Record(CheckRecord),
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle to the writer task.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    tx: mpsc::Sender<WriteCommand>,
}

impl RecordWriter {
    /// Start the writer task. It exits once every handle is dropped and the
    /// queue is drained.
    pub fn spawn(sink: Arc<dyn RecordSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(drain(sink, rx));
        (Self { tx }, handle)
    }

    /// Queue a record for persistence without waiting.
    pub fn submit(&self, record: CheckRecord) {
        if let Err(e) = self.tx.try_send(WriteCommand::Record(record)) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "queue_full",
                mpsc::error::TrySendError::Closed(_) => "writer_closed",
            };
            tracing::warn!(reason, "Dropping check record");
            metrics::record_dropped(reason);
        }
    }

    /// Wait until everything submitted before this call reached the sink.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn drain(sink: Arc<dyn RecordSink>, mut rx: mpsc::Receiver<WriteCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Record(record) => match sink.add_record(&record).await {
                Ok(true) => {}
                Ok(false) => tracing::debug!(
                    url = %record.url,
                    timestamp = %record.timestamp,
                    "Duplicate check record ignored"
                ),
                Err(e) => {
                    tracing::error!(
                        url = %record.url,
                        timestamp = %record.timestamp,
                        error = %e,
                        "Failed to persist check record"
                    );
                    metrics::record_dropped("sink_error");
                }
            },
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Record writer stopped");
}
