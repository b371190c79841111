//! Since-start check statistics.
//!
//! # Responsibilities
//! - Count total and successful checks
//! - Track the current run of consecutive failures
//! - Derive since-start availability
//!
//! # Design Decisions
//! - One mutex guards the whole counter triple, so a snapshot is never torn
//! - `record` hands back the post-update snapshot taken under the same lock
//! - Nothing here is persisted; historical truth lives in the record sink

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// Point-in-time view of the running counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningStats {
    pub total_checks: u64,
    pub ok_checks: u64,
    pub consecutive_failures: u64,
}

impl RunningStats {
    /// Percentage of successful checks, rounded to 2 decimals.
    ///
    /// `None` until the first check has been recorded.
    pub fn availability_pct(&self) -> Option<f64> {
        if self.total_checks == 0 {
            return None;
        }
        let pct = self.ok_checks as f64 / self.total_checks as f64 * 100.0;
        Some(round2(pct))
    }
}

/// Thread-safe aggregator shared by every check path.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    inner: Mutex<RunningStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one check result and return the stats as they stand afterwards.
    pub fn record(&self, ok: bool) -> RunningStats {
        let mut stats = self.lock();
        stats.total_checks += 1;
        if ok {
            stats.ok_checks += 1;
            stats.consecutive_failures = 0;
        } else {
            stats.consecutive_failures += 1;
        }
        *stats
    }

    pub fn snapshot(&self) -> RunningStats {
        *self.lock()
    }

    pub fn availability_pct(&self) -> Option<f64> {
        self.snapshot().availability_pct()
    }

    // Counters are never left half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, RunningStats> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
