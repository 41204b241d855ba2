//! Appointment-related DTOs for create, update, and list operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentChange, BookingRequest};

/// Request body for `POST /appointments`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    /// Requested calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Requested time slot label (`HH:MM`).
    pub time: String,
    /// Requested service.
    pub service: String,
    /// Client display name.
    pub client_name: String,
    /// Client phone number. At least one contact channel is required.
    #[serde(default)]
    pub client_phone: Option<String>,
    /// Client email address. At least one contact channel is required.
    #[serde(default)]
    pub client_email: Option<String>,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<CreateAppointmentRequest> for BookingRequest {
    fn from(req: CreateAppointmentRequest) -> Self {
        Self {
            date: req.date,
            time: req.time,
            service: req.service,
            client_name: req.client_name,
            client_phone: req.client_phone,
            client_email: req.client_email,
            note: req.note,
        }
    }
}

/// Request body for `PUT /appointments/{id}`. Absent fields keep their
/// current value; empty strings clear the optional fields.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    /// New calendar date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New time slot label.
    #[serde(default)]
    pub time: Option<String>,
    /// New service.
    #[serde(default)]
    pub service: Option<String>,
    /// New client display name.
    #[serde(default)]
    pub client_name: Option<String>,
    /// New phone number.
    #[serde(default)]
    pub client_phone: Option<String>,
    /// New email address.
    #[serde(default)]
    pub client_email: Option<String>,
    /// New note.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<UpdateAppointmentRequest> for AppointmentChange {
    fn from(req: UpdateAppointmentRequest) -> Self {
        Self {
            date: req.date,
            time: req.time,
            service: req.service,
            client_name: req.client_name,
            client_phone: req.client_phone,
            client_email: req.client_email,
            note: req.note,
        }
    }
}

/// A single appointment as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentResponse {
    /// Appointment identifier.
    pub id: Uuid,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time slot label.
    pub time: String,
    /// Booked service.
    pub service: String,
    /// Client display name.
    pub client_name: String,
    /// Client phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    /// Client email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: *appointment.id.as_uuid(),
            date: appointment.date,
            time: appointment.time.as_str().to_string(),
            service: appointment.service,
            client_name: appointment.client_name,
            client_phone: appointment.client_phone,
            client_email: appointment.client_email,
            note: appointment.note,
            created_at: appointment.created_at,
        }
    }
}
