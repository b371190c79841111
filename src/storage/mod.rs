//! Check record persistence.
//!
//! # Data Flow
//! ```text
//! CheckRunner
//!     → writer.rs (bounded queue, never blocks the check)
//!     → background task
//!     → RecordSink (postgres.rs or memory.rs)
//!
//! GET /records
//!     → RecordSink::get_last
//! ```
//!
//! # Design Decisions
//! - The sink owns (url, timestamp) uniqueness; duplicates are ignored
//! - Sink failures are logged and counted, never returned to a check caller
//! - Without a database URL, records live in a bounded in-memory store

pub mod memory;
pub mod postgres;
pub mod traits;
pub mod writer;

use std::sync::Arc;

use thiserror::Error;

use crate::config::StorageConfig;

pub use memory::MemoryRecordSink;
pub use postgres::PgRecordSink;
pub use traits::RecordSink;
pub use writer::RecordWriter;

/// Errors raised by record sinks.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRow(String),
}

/// Build the sink selected by `config`.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn RecordSink>, StorageError> {
    match &config.database_url {
        Some(url) => {
            let sink = PgRecordSink::connect(url, config).await?;
            tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL record store");
            Ok(Arc::new(sink))
        }
        None => {
            tracing::warn!(
                capacity = config.memory_capacity,
                "No database configured, check records are kept in memory only"
            );
            Ok(Arc::new(MemoryRecordSink::new(config.memory_capacity)))
        }
    }
}
