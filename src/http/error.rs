//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tokio::task::JoinError;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("limit must be between {min} and {max}, got {got}")]
    InvalidLimit { got: i64, min: usize, max: usize },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to read records: {0}")]
    Storage(#[from] StorageError),

    #[error("Check task failed: {0}")]
    CheckTask(#[from] JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidLimit { .. } | ApiError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) | ApiError::CheckTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
