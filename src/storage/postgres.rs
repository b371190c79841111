//! PostgreSQL record store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use crate::check::{CheckRecord, CheckSource};
use crate::config::StorageConfig;
use crate::storage::{RecordSink, StorageError};

const MAX_URL_CHARS: usize = 1024;
const MAX_ERROR_CHARS: usize = 2048;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS check_records (
        id BIGSERIAL PRIMARY KEY,
        ts TIMESTAMPTZ NOT NULL,
        url VARCHAR(1024) NOT NULL,
        status_code INTEGER,
        ok BOOLEAN NOT NULL DEFAULT FALSE,
        latency_ms DOUBLE PRECISION,
        ttfb_ms DOUBLE PRECISION,
        response_size_bytes BIGINT,
        consecutive_failures BIGINT NOT NULL DEFAULT 0,
        source VARCHAR(32) NOT NULL,
        error VARCHAR(2048),
        CONSTRAINT uq_url_ts UNIQUE (url, ts)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_check_records_ts ON check_records (ts)",
    "CREATE INDEX IF NOT EXISTS ix_check_records_url ON check_records (url)",
    "CREATE INDEX IF NOT EXISTS ix_check_records_ok ON check_records (ok)",
    "CREATE INDEX IF NOT EXISTS ix_check_records_source ON check_records (source)",
];

/// Record sink backed by a `check_records` table.
#[derive(Debug, Clone)]
pub struct PgRecordSink {
    pool: PgPool,
}

impl PgRecordSink {
    pub async fn connect(database_url: &str, config: &StorageConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSink for PgRecordSink {
    async fn init(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("check_records schema ready");
        Ok(())
    }

    async fn add_record(&self, record: &CheckRecord) -> Result<bool, StorageError> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO check_records
                (ts, url, status_code, ok, latency_ms, ttfb_ms, response_size_bytes,
                 consecutive_failures, source, error)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ON CONSTRAINT uq_url_ts DO NOTHING
            "#,
        )
        .bind(record.timestamp)
        .bind(truncate_chars(&record.url, MAX_URL_CHARS))
        .bind(record.status_code.map(i32::from))
        .bind(record.ok)
        .bind(record.latency_ms)
        .bind(record.ttfb_ms)
        .bind(record.response_size_bytes.map(clamp_i64))
        .bind(clamp_i64(record.consecutive_failures))
        .bind(record.source.as_str())
        .bind(error_column(&record.error))
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected == 1)
    }

    async fn get_last(&self, limit: usize) -> Result<Vec<CheckRecord>, StorageError> {
        let rows: Vec<CheckRecordRow> = sqlx::query_as(
            r#"
            SELECT ts, url, status_code, ok, latency_ms, ttfb_ms, response_size_bytes,
                   consecutive_failures, source, error
            FROM check_records
            ORDER BY ts DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(clamp_i64(limit as u64))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().rev().map(CheckRecord::try_from).collect()
    }
}

#[derive(Debug, FromRow)]
struct CheckRecordRow {
    ts: DateTime<Utc>,
    url: String,
    status_code: Option<i32>,
    ok: bool,
    latency_ms: Option<f64>,
    ttfb_ms: Option<f64>,
    response_size_bytes: Option<i64>,
    consecutive_failures: i64,
    source: String,
    error: Option<String>,
}

impl TryFrom<CheckRecordRow> for CheckRecord {
    type Error = StorageError;

    fn try_from(row: CheckRecordRow) -> Result<Self, Self::Error> {
        let status_code = row
            .status_code
            .map(u16::try_from)
            .transpose()
            .map_err(|_| StorageError::InvalidRow(format!("status_code {:?} out of range", row.status_code)))?;
        let source = row.source.parse::<CheckSource>().map_err(StorageError::InvalidRow)?;

        Ok(CheckRecord {
            timestamp: row.ts,
            url: row.url,
            status_code,
            ok: row.ok,
            latency_ms: row.latency_ms,
            ttfb_ms: row.ttfb_ms,
            response_size_bytes: row.response_size_bytes.map(|n| n.max(0) as u64),
            consecutive_failures: row.consecutive_failures.max(0) as u64,
            source,
            error: row.error.unwrap_or_default(),
        })
    }
}

/// Empty errors are stored as NULL.
fn error_column(error: &str) -> Option<&str> {
    if error.is_empty() {
        None
    } else {
        Some(truncate_chars(error, MAX_ERROR_CHARS))
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
