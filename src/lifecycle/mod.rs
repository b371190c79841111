//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Connect sink → init schema → spawn writer → build runner
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains, scheduler exits
//!     → writer flushed → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Pending records are flushed before the process exits

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{join_task, Shutdown};
pub use startup::{initialize, Services, StartupError};
