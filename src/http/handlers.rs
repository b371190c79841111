//! Request handlers for the monitoring API.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::check::{CheckRecord, CheckResponse, CheckSource};
use crate::http::error::ApiError;
use crate::http::server::AppState;

pub const DEFAULT_RECORDS_LIMIT: usize = 100;
pub const MAX_RECORDS_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecordsPage {
    pub count: usize,
    pub items: Vec<CheckRecord>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub target_url: String,
    pub total_checks: u64,
    pub ok_checks: u64,
    pub availability_pct: Option<f64>,
    pub consecutive_failures: u64,
}

/// `GET /` runs one manual check.
///
/// The check runs in its own task, so a client disconnect or request timeout
/// never cancels it after the probe is sent.
pub async fn check(State(state): State<AppState>) -> Result<Json<CheckResponse>, ApiError> {
    let runner = state.runner.clone();
    let response = tokio::spawn(async move { runner.run_check(CheckSource::Manual).await }).await?;
    Ok(Json(response))
}

/// `GET /records?limit=N` returns the newest records, oldest first.
pub async fn records(
    State(state): State<AppState>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<Json<RecordsPage>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let limit = resolve_limit(query.limit)?;

    let items = state.sink.get_last(limit).await?;
    Ok(Json(RecordsPage {
        count: items.len(),
        items,
    }))
}

/// `GET /stats` returns the since-start counters.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.runner.stats().snapshot();
    Json(StatsResponse {
        target_url: state.runner.target_url().to_string(),
        total_checks: snapshot.total_checks,
        ok_checks: snapshot.ok_checks,
        availability_pct: snapshot.availability_pct(),
        consecutive_failures: snapshot.consecutive_failures,
    })
}

fn resolve_limit(limit: Option<i64>) -> Result<usize, ApiError> {
    let Some(limit) = limit else {
        return Ok(DEFAULT_RECORDS_LIMIT);
    };
    usize::try_from(limit)
        .ok()
        .filter(|n| (1..=MAX_RECORDS_LIMIT).contains(n))
        .ok_or(ApiError::InvalidLimit {
            got: limit,
            min: 1,
            max: MAX_RECORDS_LIMIT,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None).unwrap(), 100);
        assert_eq!(resolve_limit(Some(1)).unwrap(), 1);
        assert_eq!(resolve_limit(Some(1000)).unwrap(), 1000);
        assert!(resolve_limit(Some(0)).is_err());
        assert!(resolve_limit(Some(-5)).is_err());
        assert!(resolve_limit(Some(1001)).is_err());
    }
}
