//! API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use services::AccountServiceError;
use std::fmt::Display;

/// Generic message for signup/login persistence failures.
pub const DATABASE_ERROR: &str = "Veritabanı hatası.";
/// Message for a failed grade submission.
pub const GRADE_NOT_SAVED: &str = "Not kaydedilemedi.";
/// Message for a failed per-student grade read.
pub const GRADES_UNAVAILABLE: &str = "Notlar getirilemedi.";

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bu isimde bir hesap zaten var.")]
    DuplicateAccount,

    #[error("Hatalı Ad Soyad veya Şifre.")]
    InvalidCredentials,

    /// `message` goes to the client; `detail` only to the log.
    #[error("{message}")]
    StoreUnavailable { message: String, detail: String },

    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },
}

impl ApiError {
    /// Store failure reported to the client with a fixed message.
    pub fn store(message: &str, err: impl Display) -> Self {
        Self::StoreUnavailable {
            message: message.to_string(),
            detail: err.to_string(),
        }
    }

    /// Store failure whose text is echoed to the client unless redaction is on.
    pub fn store_verbatim(err: impl Display, redact: bool) -> Self {
        let detail = err.to_string();
        let message = if redact {
            DATABASE_ERROR.to_string()
        } else {
            detail.clone()
        };
        Self::StoreUnavailable { message, detail }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateAccount => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::StoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest { status, .. } => *status,
        }
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::DuplicateAccount => Self::DuplicateAccount,
            AccountServiceError::InvalidCredentials => Self::InvalidCredentials,
            other => Self::store(DATABASE_ERROR, other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::StoreUnavailable { detail, .. } => {
                tracing::error!(error = %detail, "request failed on the store");
            }
            Self::BadRequest { message, .. } => {
                tracing::debug!(%status, %message, "rejected request body");
            }
            Self::DuplicateAccount | Self::InvalidCredentials => {}
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
