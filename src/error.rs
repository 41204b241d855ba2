//! Service error types with HTTP status code mapping.
//!
//! [`BookingError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response,
//! so the transport layer can distinguish "pick another slot" (409) from
//! "fix the request" (400) and "try again later" (503).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AppointmentId, SlotTime};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2003,
///     "message": "slot 2025-06-10 09:00 is already booked",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`BookingError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server/Store    | 500 / 503                    |
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// A required field is missing or malformed. The caller must fix the
    /// request; retrying unchanged will fail again.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A time string is not a valid `HH:MM` slot label.
    #[error("invalid time label: {0:?}")]
    InvalidTimeLabel(String),

    /// No appointment exists with the given id.
    #[error("appointment not found: {0}")]
    AppointmentNotFound(AppointmentId),

    /// No schedule is configured for the given date.
    #[error("no schedule configured for {0}")]
    ScheduleNotFound(NaiveDate),

    /// The requested `(date, time)` pair is already booked. The caller may
    /// retry with a different slot, never the same one.
    #[error("slot {date} {time} is already booked")]
    SlotConflict {
        /// Date of the contested slot.
        date: NaiveDate,
        /// Time label of the contested slot.
        time: SlotTime,
    },

    /// Store rejected or failed the operation.
    #[error("store error: {0}")]
    Store(String),

    /// Store is unreachable or timed out; the whole operation is safe to
    /// retry after re-checking availability.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal invariant failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidTimeLabel(_) => 1002,
            Self::AppointmentNotFound(_) => 2001,
            Self::ScheduleNotFound(_) => 2002,
            Self::SlotConflict { .. } => 2003,
            Self::Store(_) => 3001,
            Self::StoreUnavailable(_) => 3002,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidTimeLabel(_) => StatusCode::BAD_REQUEST,
            Self::AppointmentNotFound(_) | Self::ScheduleNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict { .. } => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
