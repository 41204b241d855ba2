//! In-memory implementation of the store contract.
//!
//! Mirrors the relational semantics (uniqueness on `(date, time)`, atomic
//! mutation of appointment plus schedule) behind a single async mutex, so
//! every trait method is trivially serializable. Used by the test suites
//! and for running the service without a database.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use super::BookingStore;
use crate::domain::{Appointment, AppointmentDraft, AppointmentId, DaySchedule, SlotTime};
use crate::error::BookingError;

/// Store backend holding all state in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    schedules: BTreeMap<NaiveDate, DaySchedule>,
    appointments: HashMap<AppointmentId, Appointment>,
}

impl State {
    fn holder_of(&self, date: NaiveDate, time: &SlotTime) -> Option<AppointmentId> {
        self.appointments
            .values()
            .find(|appointment| appointment.date == date && appointment.time == *time)
            .map(|appointment| appointment.id)
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn upsert_schedule(&self, schedule: DaySchedule) -> Result<DaySchedule, BookingError> {
        let mut state = self.state.lock().await;
        state.schedules.insert(schedule.date, schedule.clone());
        Ok(schedule)
    }

    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError> {
        let state = self.state.lock().await;
        Ok(state.schedules.get(&date).cloned())
    }

    async fn list_schedules(&self) -> Result<Vec<DaySchedule>, BookingError> {
        let state = self.state.lock().await;
        Ok(state.schedules.values().cloned().collect())
    }

    async fn delete_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError> {
        let mut state = self.state.lock().await;
        Ok(state.schedules.remove(&date))
    }

    async fn consume_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<bool, BookingError> {
        let mut state = self.state.lock().await;
        Ok(state
            .schedules
            .get_mut(&date)
            .is_some_and(|schedule| schedule.consume(time)))
    }

    async fn restore_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<(), BookingError> {
        let mut state = self.state.lock().await;
        if let Some(schedule) = state.schedules.get_mut(&date) {
            schedule.restore(time);
        }
        Ok(())
    }

    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<SlotTime>, BookingError> {
        let state = self.state.lock().await;
        let mut times: Vec<SlotTime> = state
            .appointments
            .values()
            .filter(|appointment| appointment.date == date)
            .map(|appointment| appointment.time.clone())
            .collect();
        times.sort();
        Ok(times)
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        let state = self.state.lock().await;
        let mut appointments: Vec<Appointment> = state.appointments.values().cloned().collect();
        appointments.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        Ok(appointments)
    }

    async fn fetch_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError> {
        let state = self.state.lock().await;
        Ok(state.appointments.get(&id).cloned())
    }

    async fn insert_appointment(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, BookingError> {
        let mut state = self.state.lock().await;
        if state.holder_of(draft.date, &draft.time).is_some() {
            return Err(BookingError::SlotConflict {
                date: draft.date,
                time: draft.time,
            });
        }

        let appointment = Appointment {
            id: AppointmentId::new(),
            date: draft.date,
            time: draft.time,
            service: draft.service,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            client_email: draft.client_email,
            note: draft.note,
            created_at: Utc::now(),
        };

        if let Some(schedule) = state.schedules.get_mut(&appointment.date) {
            schedule.consume(&appointment.time);
        }
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError> {
        let mut state = self.state.lock().await;
        let Some(appointment) = state.appointments.remove(&id) else {
            return Ok(None);
        };
        if let Some(schedule) = state.schedules.get_mut(&appointment.date) {
            schedule.restore(&appointment.time);
        }
        Ok(Some(appointment))
    }

    async fn replace_appointment(
        &self,
        updated: Appointment,
    ) -> Result<Option<Appointment>, BookingError> {
        let mut state = self.state.lock().await;
        let Some(old) = state.appointments.get(&updated.id).cloned() else {
            return Ok(None);
        };

        if (old.date, &old.time) != (updated.date, &updated.time) {
            if let Some(holder) = state.holder_of(updated.date, &updated.time)
                && holder != updated.id
            {
                return Err(BookingError::SlotConflict {
                    date: updated.date,
                    time: updated.time,
                });
            }
            if let Some(schedule) = state.schedules.get_mut(&old.date) {
                schedule.restore(&old.time);
            }
            if let Some(schedule) = state.schedules.get_mut(&updated.date) {
                schedule.consume(&updated.time);
            }
        }

        state.appointments.insert(updated.id, updated.clone());
        Ok(Some(updated))
    }
}
