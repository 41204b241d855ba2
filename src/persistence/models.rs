//! Database row models and their conversions into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentId, DaySchedule, SlotTime};
use crate::error::BookingError;

/// An appointment row from the `appointments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    /// Primary key.
    pub id: Uuid,
    /// Appointment date.
    pub date: NaiveDate,
    /// Time label, stored as text.
    pub time: String,
    /// Requested service.
    pub service: String,
    /// Client display name.
    pub client_name: String,
    /// Client phone number.
    pub client_phone: Option<String>,
    /// Client email address.
    pub client_email: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = BookingError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let time = SlotTime::parse(&row.time)
            .map_err(|_| BookingError::Store(format!("corrupt time label in row {}", row.id)))?;
        Ok(Self {
            id: AppointmentId::from_uuid(row.id),
            date: row.date,
            time,
            service: row.service,
            client_name: row.client_name,
            client_phone: row.client_phone,
            client_email: row.client_email,
            note: row.note,
            created_at: row.created_at,
        })
    }
}

/// A schedule row from the `schedules` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleRow {
    /// Schedule date, the primary key.
    pub date: NaiveDate,
    /// Offered slot labels, stored as a text array.
    pub slots: Vec<String>,
}

impl TryFrom<ScheduleRow> for DaySchedule {
    type Error = BookingError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let slots = row
            .slots
            .iter()
            .map(|label| {
                SlotTime::parse(label).map_err(|_| {
                    BookingError::Store(format!("corrupt slot label for {}", row.date))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(row.date, slots))
    }
}
