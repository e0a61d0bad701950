//! Uniform JSON envelopes returned by every endpoint.
//!
//! Success: `{"success": true, "message": "...", "data": ...}` (`data` omitted when absent).
//! Error: `{"success": false, "error": "...", "error_code": "..."}` (`error_code` optional).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> SuccessEnvelope<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, error_code: Option<&str>) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.map(str::to_string),
        }
    }
}

/// A success envelope paired with the status it is sent with.
pub struct Envelope<T> {
    status: StatusCode,
    body: SuccessEnvelope<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: SuccessEnvelope::with_data(message, data),
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: SuccessEnvelope::with_data(message, data),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
