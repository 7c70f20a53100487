//! Application error type mapping to HTTP status codes.
//!
//! Domain errors travel as typed enums until they reach this boundary.
//! Every error body carries `error` (short title) and `message`; the
//! page-size rejection also carries `max_page_size`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use switchyard_types::error::{ExperimentError, SlotError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Experiment selection errors.
    Experiment(ExperimentError),
    /// Slot listing/booking errors.
    Slot(SlotError),
    /// Request parameters that failed validation.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ExperimentError> for AppError {
    fn from(e: ExperimentError) -> Self {
        AppError::Experiment(e)
    }
}

impl From<SlotError> for AppError {
    fn from(e: SlotError) -> Self {
        AppError::Slot(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Experiment(e) if e.is_misconfiguration() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Experiment misconfigured",
                e.to_string(),
            ),
            AppError::Experiment(e) => {
                (StatusCode::NOT_FOUND, "Experiment not found", e.to_string())
            }
            AppError::Slot(SlotError::NotFound) => (
                StatusCode::NOT_FOUND,
                "Time slot not found",
                SlotError::NotFound.to_string(),
            ),
            AppError::Slot(SlotError::AlreadyBooked) => (
                StatusCode::CONFLICT,
                "Time slot already booked",
                SlotError::AlreadyBooked.to_string(),
            ),
            AppError::Slot(e @ SlotError::PageSizeExceeded { max_page_size }) => {
                tracing::warn!(max_page_size, "page size exceeded");
                let body = json!({
                    "error": "Page size exceeded",
                    "message": e.to_string(),
                    "max_page_size": max_page_size,
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::Slot(e @ (SlotError::InvalidPagination(_) | SlotError::InvalidEmail(_))) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error",
                e.to_string(),
            ),
            AppError::Slot(SlotError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "the slot store is unavailable, try again later".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Validation error", msg.clone())
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                "internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, %status, "request failed");
        } else {
            tracing::debug!(error = ?self, %status, "request rejected");
        }

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}
