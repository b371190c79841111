//! Target probing subsystem.
//!
//! # Data Flow
//! ```text
//! CheckRunner
//!     → executor.rs (one HTTP GET, body streamed chunk by chunk)
//!     → outcome.rs (Response or Failed, never an error)
//! ```
//!
//! # Design Decisions
//! - One reqwest client for the process, built at startup
//! - Every transport problem becomes `ProbeOutcome::Failed`
//! - Timings share one start instant, so ttfb never exceeds latency

pub mod executor;
pub mod outcome;

pub use executor::{ProbeError, ProbeExecutor};
pub use outcome::{ProbeFailure, ProbeOutcome, ProbeResponse};
