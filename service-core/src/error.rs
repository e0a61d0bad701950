use crate::response::ErrorEnvelope;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error code attached to required-field and payload validation failures.
pub const VALIDATION_ERROR_CODE: &str = "VAL_001";

/// Error code attached to failures reported by an upstream provider.
pub const UPSTREAM_ERROR_CODE: &str = "EXT_001";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal error during {0}")]
    OperationFailed(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl AppError {
    /// Errors caused by the caller or the upstream provider; these are shown as-is.
    /// Everything else is an unexpected failure whose details stay in the logs.
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            AppError::MissingFields(_)
                | AppError::ValidationError(_)
                | AppError::BadRequest(_)
                | AppError::Upstream(_)
                | AppError::NotFound(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_)
            | AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::Upstream(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::OperationFailed(_)
            | AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_message, error_code) = match self {
            AppError::MissingFields(_) => (self.to_string(), Some(VALIDATION_ERROR_CODE)),
            AppError::ValidationError(_) => {
                ("Invalid data".to_string(), Some(VALIDATION_ERROR_CODE))
            }
            AppError::BadRequest(err) => (err.to_string(), None),
            AppError::Upstream(msg) => (msg, Some(UPSTREAM_ERROR_CODE)),
            AppError::NotFound(_) | AppError::OperationFailed(_) => (self.to_string(), None),
            AppError::InternalError(_) => ("Internal server error".to_string(), None),
            AppError::DatabaseError(_) => ("Database error".to_string(), None),
            AppError::ConfigError(_) => ("Configuration error".to_string(), None),
            AppError::ServiceUnavailable => ("Service unavailable".to_string(), None),
        };

        (status, Json(ErrorEnvelope::new(error_message, error_code))).into_response()
    }
}
