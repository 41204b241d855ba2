//! Persistence layer: the relational store contract and its backends.
//!
//! [`BookingStore`] is the seam between the booking core and the shared
//! relational store. The mutation methods that touch both an appointment row
//! and a schedule row are defined as single atomic units, because the
//! check-then-act sequence inside them must not be observable half-done:
//! two concurrent bookings for one `(date, time)` pair must resolve to
//! exactly one success and one [`SlotConflict`](crate::error::BookingError::SlotConflict).
//!
//! Two implementations ship: [`PostgresStore`] (sqlx, one transaction per
//! mutation, `UNIQUE (date, time)` backstop) for production, and
//! [`InMemoryStore`] (one async mutex, trivially atomic) for tests and
//! local development. Neither the services nor the stores cache state in
//! process memory; every read re-queries, so multiple processes may share
//! one database.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use crate::domain::{Appointment, AppointmentDraft, AppointmentId, DaySchedule, SlotTime};
use crate::error::BookingError;

/// Contract between the booking core and the shared relational store.
///
/// Implementations must uphold, per method, the atomicity notes below; the
/// services layered on top contain no compensation logic.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug {
    /// Creates or wholly replaces the schedule for `schedule.date`
    /// (overwrite-wins; no reconciliation against existing appointments).
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn upsert_schedule(&self, schedule: DaySchedule) -> Result<DaySchedule, BookingError>;

    /// Returns the schedule configured for `date`, if any.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError>;

    /// Returns all configured schedules ordered by date ascending.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn list_schedules(&self) -> Result<Vec<DaySchedule>, BookingError>;

    /// Deletes the schedule for `date`, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn delete_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError>;

    /// Removes `time` from the schedule configured for `date`.
    ///
    /// Returns `false` (not an error) when no schedule exists for `date` or
    /// the label is not currently offered.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn consume_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<bool, BookingError>;

    /// Re-adds `time` to the schedule configured for `date`.
    ///
    /// Idempotent; a no-op when `date` has no configured schedule.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn restore_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<(), BookingError>;

    /// Returns the time labels of all active appointments on `date`,
    /// ordered ascending.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<SlotTime>, BookingError>;

    /// Returns all appointments ordered by `(date, time)` ascending.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn list_appointments(&self) -> Result<Vec<Appointment>, BookingError>;

    /// Returns the appointment with the given id, if present.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    async fn fetch_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError>;

    /// Books an appointment: conflict check, insert, and slot consumption
    /// as one atomic unit.
    ///
    /// The id and creation timestamp are generated here. A time absent from
    /// the configured schedule (or an unconfigured date) is still bookable;
    /// slot consumption is best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::SlotConflict`] when an appointment already
    /// holds `(date, time)`, or a store-class error on backend failure.
    /// On any error no partial state remains.
    async fn insert_appointment(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, BookingError>;

    /// Cancels an appointment: row deletion and slot restoration as one
    /// atomic unit. Returns the deleted appointment, or `None` when the id
    /// is unknown.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure; on any
    /// error no partial state remains.
    async fn delete_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError>;

    /// Replaces an appointment's fields, re-checking uniqueness against all
    /// *other* appointments and moving slot consumption (restore the old
    /// label, consume the new) in one atomic unit. Returns `None` when the
    /// id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::SlotConflict`] when another appointment holds
    /// the target `(date, time)`, or a store-class error on backend failure.
    /// On any error no partial state remains.
    async fn replace_appointment(
        &self,
        updated: Appointment,
    ) -> Result<Option<Appointment>, BookingError>;
}
