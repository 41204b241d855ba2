//! Availability registry: the administrative and read surface over
//! per-date schedules.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{DaySchedule, SlotTime};
use crate::error::BookingError;
use crate::persistence::BookingStore;

/// Source of truth for which `(date, time)` pairs are currently offered.
///
/// Stateless coordinator over the injected store; never caches schedules
/// in process memory, so multiple instances may run against one database.
#[derive(Debug, Clone)]
pub struct AvailabilityRegistry {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityRegistry {
    /// Creates a new registry over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Creates or wholly replaces the schedule for `date`.
    ///
    /// Labels are validated and duplicates silently collapsed. Overwriting
    /// an existing schedule does **not** reconcile slots consumed by
    /// outstanding appointments; callers replacing a schedule must re-add
    /// any already-booked times themselves. [`Self::available_times`]
    /// subtracts booked times regardless, so an overwrite can never
    /// re-offer an occupied slot.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimeLabel`] for a malformed label, or
    /// a store-class error on backend failure.
    pub async fn set_schedule(
        &self,
        date: NaiveDate,
        labels: &[String],
    ) -> Result<DaySchedule, BookingError> {
        let slots = labels
            .iter()
            .map(|label| SlotTime::parse(label.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        let schedule = self
            .store
            .upsert_schedule(DaySchedule::new(date, slots))
            .await?;
        tracing::info!(%date, slots = schedule.slots.len(), "schedule configured");
        Ok(schedule)
    }

    /// Returns the schedule configured for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ScheduleNotFound`] when none is configured,
    /// or a store-class error on backend failure.
    pub async fn get_schedule(&self, date: NaiveDate) -> Result<DaySchedule, BookingError> {
        self.store
            .fetch_schedule(date)
            .await?
            .ok_or(BookingError::ScheduleNotFound(date))
    }

    /// Returns all configured schedules, ordered by date ascending.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    pub async fn list_schedules(&self) -> Result<Vec<DaySchedule>, BookingError> {
        self.store.list_schedules().await
    }

    /// Deletes the schedule for `date`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ScheduleNotFound`] when none is configured,
    /// or a store-class error on backend failure.
    pub async fn delete_schedule(&self, date: NaiveDate) -> Result<DaySchedule, BookingError> {
        let deleted = self
            .store
            .delete_schedule(date)
            .await?
            .ok_or(BookingError::ScheduleNotFound(date))?;
        tracing::info!(%date, "schedule deleted");
        Ok(deleted)
    }

    /// Returns the bookable times for `date`: the configured slots minus
    /// the times held by active appointments.
    ///
    /// A date with no configured schedule yields an empty sequence, never
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    pub async fn available_times(&self, date: NaiveDate) -> Result<Vec<SlotTime>, BookingError> {
        let Some(schedule) = self.store.fetch_schedule(date).await? else {
            return Ok(Vec::new());
        };
        let booked = self.store.booked_times(date).await?;
        Ok(schedule.minus(&booked))
    }

    /// Removes `time` from the offered set for `date`; `false` when the
    /// schedule or label is absent.
    ///
    /// The booking transaction performs this mutation itself, atomically
    /// with the appointment insert; this method is the standalone surface
    /// for administrative corrections.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    pub async fn consume_slot(
        &self,
        date: NaiveDate,
        time: &SlotTime,
    ) -> Result<bool, BookingError> {
        self.store.consume_slot(date, time).await
    }

    /// Re-adds `time` to the offered set for `date`. Idempotent; a no-op
    /// when the date has no configured schedule.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    pub async fn restore_slot(
        &self,
        date: NaiveDate,
        time: &SlotTime,
    ) -> Result<(), BookingError> {
        self.store.restore_slot(date, time).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::AppointmentDraft;
    use crate::persistence::InMemoryStore;

    fn date() -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 6, 10) else {
            panic!("valid date");
        };
        date
    }

    fn slot(label: &str) -> SlotTime {
        let Ok(slot) = SlotTime::parse(label) else {
            panic!("valid label: {label}");
        };
        slot
    }

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn registry() -> (Arc<InMemoryStore>, AvailabilityRegistry) {
        let store = Arc::new(InMemoryStore::new());
        let registry = AvailabilityRegistry::new(Arc::clone(&store) as Arc<dyn BookingStore>);
        (store, registry)
    }

    #[tokio::test]
    async fn set_schedule_sorts_and_dedups() {
        let (_, registry) = registry();
        let Ok(schedule) = registry
            .set_schedule(date(), &labels(&["10:00", "09:00", "10:00"]))
            .await
        else {
            panic!("set_schedule failed");
        };
        assert_eq!(schedule.slots, vec![slot("09:00"), slot("10:00")]);
    }

    #[tokio::test]
    async fn set_schedule_rejects_bad_label() {
        let (_, registry) = registry();
        let result = registry.set_schedule(date(), &labels(&["09:00", "9pm"])).await;
        assert!(matches!(result, Err(BookingError::InvalidTimeLabel(_))));
    }

    #[tokio::test]
    async fn unconfigured_date_yields_empty_times() {
        let (_, registry) = registry();
        let Ok(times) = registry.available_times(date()).await else {
            panic!("available_times errored");
        };
        assert!(times.is_empty());
    }

    #[tokio::test]
    async fn get_schedule_unknown_date_not_found() {
        let (_, registry) = registry();
        let result = registry.get_schedule(date()).await;
        assert!(matches!(result, Err(BookingError::ScheduleNotFound(_))));
    }

    #[tokio::test]
    async fn delete_schedule_round_trip() {
        let (_, registry) = registry();
        let Ok(_) = registry.set_schedule(date(), &labels(&["09:00"])).await else {
            panic!("set_schedule failed");
        };
        let Ok(deleted) = registry.delete_schedule(date()).await else {
            panic!("delete_schedule failed");
        };
        assert_eq!(deleted.slots, vec![slot("09:00")]);
        let again = registry.delete_schedule(date()).await;
        assert!(matches!(again, Err(BookingError::ScheduleNotFound(_))));
    }

    #[tokio::test]
    async fn overwrite_does_not_reoffer_booked_time() {
        let (store, registry) = registry();
        let Ok(_) = registry.set_schedule(date(), &labels(&["09:00", "10:00"])).await else {
            panic!("set_schedule failed");
        };
        let draft = AppointmentDraft {
            date: date(),
            time: slot("09:00"),
            service: "haircut".to_string(),
            client_name: "Dana Mori".to_string(),
            client_phone: Some("+43 660 1234567".to_string()),
            client_email: None,
            note: None,
        };
        let Ok(_) = store.insert_appointment(draft).await else {
            panic!("insert failed");
        };

        // Overwrite re-adds the booked 09:00 to the stored set; the
        // registry must still not offer it.
        let Ok(schedule) = registry
            .set_schedule(date(), &labels(&["09:00", "10:00", "11:00"]))
            .await
        else {
            panic!("set_schedule failed");
        };
        assert!(schedule.contains(&slot("09:00")));

        let Ok(times) = registry.available_times(date()).await else {
            panic!("available_times errored");
        };
        assert_eq!(times, vec![slot("10:00"), slot("11:00")]);
    }

    #[tokio::test]
    async fn consume_and_restore_slot() {
        let (_, registry) = registry();
        let Ok(_) = registry.set_schedule(date(), &labels(&["09:00", "10:00"])).await else {
            panic!("set_schedule failed");
        };

        let Ok(removed) = registry.consume_slot(date(), &slot("09:00")).await else {
            panic!("consume errored");
        };
        assert!(removed);
        let Ok(removed_again) = registry.consume_slot(date(), &slot("09:00")).await else {
            panic!("consume errored");
        };
        assert!(!removed_again);

        let Ok(()) = registry.restore_slot(date(), &slot("09:00")).await else {
            panic!("restore errored");
        };
        let Ok(()) = registry.restore_slot(date(), &slot("09:00")).await else {
            panic!("restore errored");
        };
        let Ok(times) = registry.available_times(date()).await else {
            panic!("available_times errored");
        };
        assert_eq!(times, vec![slot("09:00"), slot("10:00")]);
    }
}
