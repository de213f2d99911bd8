use crate::database::DatabaseError;
use crate::lottery::LotteryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error;
use uuid::Uuid;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Store errors that are not domain outcomes
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Event or resource absent
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Applying to an event whose lottery has already run
    #[error("Lottery for event {0} has already been drawn; applications are closed")]
    LotteryClosed(Uuid),

    /// Second lottery trigger for the same event
    #[error("Lottery for event {0} has already been executed")]
    AlreadyExecuted(Uuid),

    /// Lottery triggered with no pending applications
    #[error("Event {0} has no pending applications")]
    EmptyPool(Uuid),

    /// Results requested before the lottery ran
    #[error("Lottery for event {0} has not been executed yet")]
    ResultsNotReady(Uuid),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Validation error naming every missing required field
    pub fn missing_fields(fields: &[&str]) -> Self {
        AppError::Validation(format!("Missing required field(s): {}", fields.join(", ")))
    }

    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Check if error is caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation(_)
            | AppError::LotteryClosed(_)
            | AppError::AlreadyExecuted(_)
            | AppError::EmptyPool(_)
            | AppError::ResultsNotReady(_) => 400,
            AppError::Config(_) => 500,
            AppError::Database(_) | AppError::Storage(_) => 500,
            _ => 500,
        }
    }

    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::LotteryClosed(_) => "LOTTERY_CLOSED",
            AppError::AlreadyExecuted(_) => "ALREADY_EXECUTED",
            AppError::EmptyPool(_) => "EMPTY_POOL",
            AppError::ResultsNotReady(_) => "RESULTS_NOT_READY",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Map a draw failure onto the event it was drawn for
pub fn lottery_error(event_id: Uuid, err: LotteryError) -> AppError {
    match err {
        LotteryError::EmptyPool => AppError::EmptyPool(event_id),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details stay in the logs
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        let body = ErrorBody {
            error: message,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::ConstraintViolation(msg) => AppError::Validation(msg),
            RepositoryError::Query(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                // PostgreSQL SQLSTATE codes
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    // Foreign key violation
                    Some("23503") => RepositoryError::ConstraintViolation(db_err.message().to_string()),
                    // Check constraint violation
                    Some("23514") => RepositoryError::ConstraintViolation(db_err.message().to_string()),
                    _ => RepositoryError::Query(err),
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}
