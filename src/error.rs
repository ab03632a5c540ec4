use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Error)]
pub enum TicketLogError {
    #[error("ticket log I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ticket log could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("ticket log could not be replaced: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("ticket log task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failure of a multi-step workflow that touches both the store and the
/// local ticket log.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    TicketLog(#[from] TicketLogError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    TicketLog(#[from] TicketLogError),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Store(e) => AppError::Store(e),
            WorkflowError::TicketLog(e) => AppError::TicketLog(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Store(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Attendance store unavailable",
            ),
            AppError::TicketLog(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Ticket log unavailable"),
            AppError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Page could not be rendered",
            ),
        };
        error!(status = %status, "Request failed: {}", self);

        (
            status,
            Json(json!({ "message": message, "outcome": "error" })),
        )
            .into_response()
    }
}
