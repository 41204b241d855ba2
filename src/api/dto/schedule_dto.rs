//! Schedule- and availability-related DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DaySchedule, SlotTime};

/// Request body for `POST /schedules`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetScheduleRequest {
    /// Calendar date the schedule applies to (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Offered time slot labels (`HH:MM`). Duplicates are collapsed.
    pub slots: Vec<String>,
}

/// A configured schedule as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    /// Calendar date the schedule applies to.
    pub date: NaiveDate,
    /// Offered slot labels, sorted ascending.
    pub slots: Vec<String>,
}

impl From<DaySchedule> for ScheduleResponse {
    fn from(schedule: DaySchedule) -> Self {
        Self {
            date: schedule.date,
            slots: schedule
                .slots
                .into_iter()
                .map(|slot| slot.as_str().to_string())
                .collect(),
        }
    }
}

/// Bookable times for one date, as returned by `GET /availability/{date}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// The queried date.
    pub date: NaiveDate,
    /// Currently bookable slot labels, sorted ascending. Empty when no
    /// schedule is configured or everything is booked.
    pub times: Vec<String>,
}

impl AvailabilityResponse {
    /// Builds the response from the registry's slot list.
    #[must_use]
    pub fn new(date: NaiveDate, times: Vec<SlotTime>) -> Self {
        Self {
            date,
            times: times
                .into_iter()
                .map(|slot| slot.as_str().to_string())
                .collect(),
        }
    }
}
