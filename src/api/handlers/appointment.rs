//! Appointment endpoint handlers: book, list, update, cancel.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{
    AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::app_state::AppState;
use crate::domain::AppointmentId;
use crate::error::{BookingError, ErrorResponse};

/// `POST /appointments` — Book an appointment.
///
/// # Errors
///
/// Returns [`BookingError`] on invalid fields or when the slot is already
/// booked.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "Book an appointment",
    description = "Validates the request, then atomically checks the slot, inserts the appointment, and consumes the matching availability. A confirmation email is sent best-effort after commit.",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 409, description = "Slot already booked", body = ErrorResponse),
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let appointment = state.ledger.create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse::from(appointment)),
    ))
}

/// `GET /appointments` — List all appointments.
///
/// # Errors
///
/// Returns [`BookingError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "List appointments",
    description = "Returns all appointments ordered by date and time ascending.",
    responses(
        (status = 200, description = "Appointment list", body = Vec<AppointmentResponse>),
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BookingError> {
    let appointments = state.ledger.list().await?;
    let data: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();
    Ok(Json(data))
}

/// `PUT /appointments/{id}` — Update an appointment.
///
/// # Errors
///
/// Returns [`BookingError`] when the id is unknown, the merged record is
/// invalid, or the target slot is held by another appointment.
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Update an appointment",
    description = "Applies a partial change. Moving the appointment to another (date, time) re-checks uniqueness against all other appointments and moves the consumed slot atomically.",
    params(
        ("id" = uuid::Uuid, Path, description = "Appointment UUID"),
    ),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentResponse),
        (status = 400, description = "Merged record would be invalid", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
        (status = 409, description = "Target slot already booked", body = ErrorResponse),
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let appointment = state
        .ledger
        .update(AppointmentId::from_uuid(id), req.into())
        .await?;
    Ok(Json(AppointmentResponse::from(appointment)))
}

/// `DELETE /appointments/{id}` — Cancel an appointment.
///
/// # Errors
///
/// Returns [`BookingError::AppointmentNotFound`] when the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Cancel an appointment",
    description = "Deletes the appointment and restores its slot to the availability set in one atomic operation. Returns the deleted record.",
    params(
        ("id" = uuid::Uuid, Path, description = "Appointment UUID"),
    ),
    responses(
        (status = 200, description = "Cancelled appointment", body = AppointmentResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let appointment = state.ledger.cancel(AppointmentId::from_uuid(id)).await?;
    Ok(Json(AppointmentResponse::from(appointment)))
}

/// Appointment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/appointments/{id}",
            put(update_appointment).delete(delete_appointment),
        )
}
