//! Check orchestration.
//!
//! # Data Flow
//! ```text
//! Scheduler (auto) ─┐
//!                   ├→ runner.rs
//! GET / (manual) ───┘     → ProbeExecutor
//!                         → StatsAggregator::record (post-update snapshot)
//!                         → record.rs (CheckRecord) → RecordWriter
//!                         → record.rs (CheckResponse) → caller
//! ```

pub mod record;
pub mod runner;

pub use record::{CheckRecord, CheckResponse, CheckSource};
pub use runner::CheckRunner;
