//! Error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}` with
//! the status the domain error reports. Store failures are logged and
//! answered without internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use furlough_core::blackout::BlackoutError;
use furlough_core::calendar::RangeError;
use furlough_core::ledger::LedgerError;
use furlough_core::lifecycle::LifecycleError;
use furlough_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// An error on its way to becoming an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 for malformed input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// 404 for an unknown location key in the path.
    #[must_use]
    pub fn unknown_location(key: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "LOCATION_NOT_FOUND",
            format!("Unknown location '{key}'"),
        )
    }

    /// The HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn from_domain(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
            "An error occurred, please retry".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<BlackoutError> for ApiError {
    fn from(e: BlackoutError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<RangeError> for ApiError {
    fn from(e: RangeError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::from_domain(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::from(AppError::Database(e.to_string()))
    }
}
