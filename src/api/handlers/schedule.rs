//! Schedule and availability endpoint handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;

use crate::api::dto::{AvailabilityResponse, ScheduleResponse, SetScheduleRequest};
use crate::app_state::AppState;
use crate::error::{BookingError, ErrorResponse};

/// `POST /schedules` — Create or replace a date's schedule.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTimeLabel`] for a malformed slot label.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    tag = "Schedules",
    summary = "Set a date's schedule",
    description = "Upserts the bookable slots for a date (overwrite-wins). Slots consumed by outstanding appointments are not reconciled; re-add booked times explicitly when replacing a schedule.",
    request_body = SetScheduleRequest,
    responses(
        (status = 200, description = "Upserted schedule", body = ScheduleResponse),
        (status = 400, description = "Malformed slot label", body = ErrorResponse),
    )
)]
pub async fn set_schedule(
    State(state): State<AppState>,
    Json(req): Json<SetScheduleRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let schedule = state.registry.set_schedule(req.date, &req.slots).await?;
    Ok(Json(ScheduleResponse::from(schedule)))
}

/// `GET /schedules` — List all configured schedules.
///
/// # Errors
///
/// Returns [`BookingError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    tag = "Schedules",
    summary = "List schedules",
    description = "Returns every configured schedule ordered by date ascending.",
    responses(
        (status = 200, description = "Schedule list", body = Vec<ScheduleResponse>),
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BookingError> {
    let schedules = state.registry.list_schedules().await?;
    let data: Vec<ScheduleResponse> = schedules.into_iter().map(ScheduleResponse::from).collect();
    Ok(Json(data))
}

/// `GET /schedules/{date}` — Get one date's schedule.
///
/// # Errors
///
/// Returns [`BookingError::ScheduleNotFound`] when the date has no
/// configured schedule.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{date}",
    tag = "Schedules",
    summary = "Get a date's schedule",
    params(
        ("date" = NaiveDate, Path, description = "Calendar date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Configured schedule", body = ScheduleResponse),
        (status = 404, description = "No schedule for this date", body = ErrorResponse),
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, BookingError> {
    let schedule = state.registry.get_schedule(date).await?;
    Ok(Json(ScheduleResponse::from(schedule)))
}

/// `DELETE /schedules/{date}` — Delete one date's schedule.
///
/// # Errors
///
/// Returns [`BookingError::ScheduleNotFound`] when the date has no
/// configured schedule.
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{date}",
    tag = "Schedules",
    summary = "Delete a date's schedule",
    description = "Removes the whole schedule for a date and returns it. Existing appointments on that date are untouched.",
    params(
        ("date" = NaiveDate, Path, description = "Calendar date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Deleted schedule", body = ScheduleResponse),
        (status = 404, description = "No schedule for this date", body = ErrorResponse),
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, BookingError> {
    let schedule = state.registry.delete_schedule(date).await?;
    Ok(Json(ScheduleResponse::from(schedule)))
}

/// `GET /availability/{date}` — Bookable times for a date.
///
/// # Errors
///
/// Returns [`BookingError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/availability/{date}",
    tag = "Schedules",
    summary = "Get bookable times",
    description = "Returns the configured slots minus the times held by active appointments. A date with no configured schedule yields an empty list, never an error.",
    params(
        ("date" = NaiveDate, Path, description = "Calendar date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Bookable times", body = AvailabilityResponse),
    )
)]
pub async fn available_times(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, BookingError> {
    let times = state.registry.available_times(date).await?;
    Ok(Json(AvailabilityResponse::new(date, times)))
}

/// Schedule and availability routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_schedules).post(set_schedule))
        .route(
            "/schedules/{date}",
            get(get_schedule).delete(delete_schedule),
        )
        .route("/availability/{date}", get(available_times))
}
