//! Appointment records and their validated construction.
//!
//! [`BookingRequest`] is the raw, transport-agnostic input for a booking.
//! [`AppointmentDraft`] is the validated form the ledger hands to the store;
//! building one performs every field check, so validation failures never
//! touch the store. [`AppointmentChange`] is the merge-style input for
//! editing an existing appointment.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::SlotTime;
use crate::error::BookingError;

/// Unique identifier for an appointment.
///
/// Wraps a UUID v4, generated by the store on insert and immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(uuid::Uuid);

impl AppointmentId {
    /// Creates a new random `AppointmentId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates an `AppointmentId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for AppointmentId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

/// A booked appointment.
///
/// At most one appointment may exist for a given `(date, time)` pair at any
/// moment; the store enforces this invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store-generated identifier.
    pub id: AppointmentId,
    /// Calendar date of the appointment.
    pub date: NaiveDate,
    /// Time slot label.
    pub time: SlotTime,
    /// Requested service.
    pub service: String,
    /// Client display name.
    pub client_name: String,
    /// Client phone number, if provided.
    pub client_phone: Option<String>,
    /// Client email address, if provided.
    pub client_email: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Creation timestamp, set by the store.
    pub created_at: DateTime<Utc>,
}

/// Raw booking input before validation.
///
/// Transport-agnostic: the HTTP layer maps its request DTO onto this and
/// the ledger validates it into an [`AppointmentDraft`].
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Requested calendar date.
    pub date: NaiveDate,
    /// Requested time label, unvalidated.
    pub time: String,
    /// Requested service.
    pub service: String,
    /// Client display name.
    pub client_name: String,
    /// Client phone number.
    pub client_phone: Option<String>,
    /// Client email address.
    pub client_email: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// A fully validated appointment waiting for its store-generated identity.
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    /// Calendar date of the appointment.
    pub date: NaiveDate,
    /// Validated time slot label.
    pub time: SlotTime,
    /// Requested service, trimmed and non-empty.
    pub service: String,
    /// Client display name, trimmed and non-empty.
    pub client_name: String,
    /// Client phone number.
    pub client_phone: Option<String>,
    /// Client email address.
    pub client_email: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl TryFrom<BookingRequest> for AppointmentDraft {
    type Error = BookingError;

    fn try_from(request: BookingRequest) -> Result<Self, Self::Error> {
        let time = SlotTime::parse(request.time.trim())?;
        let service = required(&request.service, "service")?;
        let client_name = required(&request.client_name, "client_name")?;
        let client_phone = normalized(request.client_phone);
        let client_email = normalized(request.client_email);
        if client_phone.is_none() && client_email.is_none() {
            return Err(BookingError::Validation(
                "at least one contact channel (client_phone or client_email) is required"
                    .to_string(),
            ));
        }

        Ok(Self {
            date: request.date,
            time,
            service,
            client_name,
            client_phone,
            client_email,
            note: normalized(request.note),
        })
    }
}

/// Partial update for an existing appointment.
///
/// Absent fields keep their current value. For the optional fields, an
/// empty string clears the value; clearing both contact channels fails
/// validation.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChange {
    /// New calendar date.
    pub date: Option<NaiveDate>,
    /// New time label, unvalidated.
    pub time: Option<String>,
    /// New service.
    pub service: Option<String>,
    /// New client display name.
    pub client_name: Option<String>,
    /// New phone number (empty string clears).
    pub client_phone: Option<String>,
    /// New email address (empty string clears).
    pub client_email: Option<String>,
    /// New note (empty string clears).
    pub note: Option<String>,
}

impl AppointmentChange {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.service.is_none()
            && self.client_name.is_none()
            && self.client_phone.is_none()
            && self.client_email.is_none()
            && self.note.is_none()
    }

    /// Merges this change onto `current`, re-running full validation on the
    /// result. The id and creation timestamp are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] or
    /// [`BookingError::InvalidTimeLabel`] when the merged record would be
    /// invalid.
    pub fn apply(&self, current: &Appointment) -> Result<Appointment, BookingError> {
        let time = match &self.time {
            Some(label) => SlotTime::parse(label.trim())?,
            None => current.time.clone(),
        };
        let service = match &self.service {
            Some(value) => required(value, "service")?,
            None => current.service.clone(),
        };
        let client_name = match &self.client_name {
            Some(value) => required(value, "client_name")?,
            None => current.client_name.clone(),
        };
        let client_phone = merge_optional(&self.client_phone, &current.client_phone);
        let client_email = merge_optional(&self.client_email, &current.client_email);
        if client_phone.is_none() && client_email.is_none() {
            return Err(BookingError::Validation(
                "at least one contact channel (client_phone or client_email) is required"
                    .to_string(),
            ));
        }

        Ok(Appointment {
            id: current.id,
            date: self.date.unwrap_or(current.date),
            time,
            service,
            client_name,
            client_phone,
            client_email,
            note: merge_optional(&self.note, &current.note),
            created_at: current.created_at,
        })
    }
}

/// Trims `value` and rejects empty results.
fn required(value: &str, field: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::Validation(format!(
            "{field} must be present and non-empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional field, mapping empty or whitespace-only input to `None`.
fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Merge rule for optional fields: absent keeps current, empty clears.
fn merge_optional(change: &Option<String>, current: &Option<String>) -> Option<String> {
    match change {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => current.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn request() -> BookingRequest {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 6, 10) else {
            panic!("valid date");
        };
        BookingRequest {
            date,
            time: "09:00".to_string(),
            service: "haircut".to_string(),
            client_name: "Dana Mori".to_string(),
            client_phone: Some("+43 660 1234567".to_string()),
            client_email: None,
            note: None,
        }
    }

    fn appointment() -> Appointment {
        let draft_request = request();
        let Ok(draft) = AppointmentDraft::try_from(draft_request) else {
            panic!("valid draft");
        };
        Appointment {
            id: AppointmentId::new(),
            date: draft.date,
            time: draft.time,
            service: draft.service,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            client_email: draft.client_email,
            note: draft.note,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn draft_accepts_valid_request() {
        assert!(AppointmentDraft::try_from(request()).is_ok());
    }

    #[test]
    fn draft_rejects_missing_contact() {
        let mut req = request();
        req.client_phone = Some("   ".to_string());
        req.client_email = None;
        let result = AppointmentDraft::try_from(req);
        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[test]
    fn draft_rejects_empty_service() {
        let mut req = request();
        req.service = String::new();
        assert!(matches!(
            AppointmentDraft::try_from(req),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn draft_rejects_bad_time_label() {
        let mut req = request();
        req.time = "9am".to_string();
        assert!(matches!(
            AppointmentDraft::try_from(req),
            Err(BookingError::InvalidTimeLabel(_))
        ));
    }

    #[test]
    fn draft_normalizes_whitespace() {
        let mut req = request();
        req.time = " 09:00 ".to_string();
        req.client_email = Some("  dana@example.com  ".to_string());
        let Ok(draft) = AppointmentDraft::try_from(req) else {
            panic!("valid draft");
        };
        assert_eq!(draft.time.as_str(), "09:00");
        assert_eq!(draft.client_email.as_deref(), Some("dana@example.com"));
    }

    #[test]
    fn change_keeps_unset_fields() {
        let current = appointment();
        let change = AppointmentChange {
            service: Some("coloring".to_string()),
            ..AppointmentChange::default()
        };
        let Ok(updated) = change.apply(&current) else {
            panic!("valid change");
        };
        assert_eq!(updated.service, "coloring");
        assert_eq!(updated.date, current.date);
        assert_eq!(updated.time, current.time);
        assert_eq!(updated.id, current.id);
        assert_eq!(updated.created_at, current.created_at);
    }

    #[test]
    fn change_cannot_clear_all_contacts() {
        let current = appointment();
        let change = AppointmentChange {
            client_phone: Some(String::new()),
            ..AppointmentChange::default()
        };
        assert!(matches!(
            change.apply(&current),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn change_moves_slot() {
        let current = appointment();
        let change = AppointmentChange {
            time: Some("11:30".to_string()),
            ..AppointmentChange::default()
        };
        let Ok(updated) = change.apply(&current) else {
            panic!("valid change");
        };
        assert_eq!(updated.time.as_str(), "11:30");
    }

    #[test]
    fn empty_change_is_detectable() {
        assert!(AppointmentChange::default().is_empty());
        let change = AppointmentChange {
            note: Some("bring photo".to_string()),
            ..AppointmentChange::default()
        };
        assert!(!change.is_empty());
    }
}
