//! Single-target availability monitor library.

pub mod check;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod scheduler;
pub mod stats;
pub mod storage;

pub use check::{CheckRecord, CheckResponse, CheckRunner, CheckSource};
pub use config::MonitorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use scheduler::Scheduler;
pub use stats::StatsAggregator;
