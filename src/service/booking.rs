//! Booking ledger: appointment lifecycle and the uniqueness invariant.

use std::sync::Arc;

use crate::domain::{
    Appointment, AppointmentChange, AppointmentDraft, AppointmentId, BookingRequest,
};
use crate::error::BookingError;
use crate::notify::{confirmation_message, Notifier};
use crate::persistence::BookingStore;

/// Orchestration layer for the appointment lifecycle.
///
/// Validates input before any store contact, delegates the atomic
/// check-insert-consume / delete-restore units to the store, and enqueues
/// confirmation notifications as detached tasks whose outcome never
/// affects the booking result.
#[derive(Debug, Clone)]
pub struct BookingLedger {
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
}

impl BookingLedger {
    /// Creates a new ledger over the given store and notification channel.
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Books an appointment.
    ///
    /// Field validation runs first; a validation failure performs no store
    /// mutation. The conflict check, row insert, and slot consumption then
    /// execute as one atomic store operation. On success a confirmation is
    /// dispatched on a detached task.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] or
    /// [`BookingError::InvalidTimeLabel`] for bad input,
    /// [`BookingError::SlotConflict`] when the slot is already booked, or a
    /// store-class error on backend failure.
    pub async fn create(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        let draft = AppointmentDraft::try_from(request)?;
        let appointment = self.store.insert_appointment(draft).await?;
        tracing::info!(
            id = %appointment.id,
            date = %appointment.date,
            time = %appointment.time,
            "appointment booked"
        );
        self.dispatch_confirmation(&appointment);
        Ok(appointment)
    }

    /// Returns all appointments ordered by `(date, time)` ascending.
    ///
    /// # Errors
    ///
    /// Returns a store-class [`BookingError`] on backend failure.
    pub async fn list(&self) -> Result<Vec<Appointment>, BookingError> {
        self.store.list_appointments().await
    }

    /// Cancels an appointment, restoring its slot, and returns the deleted
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::AppointmentNotFound`] for an unknown id, or
    /// a store-class error on backend failure.
    pub async fn cancel(&self, id: AppointmentId) -> Result<Appointment, BookingError> {
        let appointment = self
            .store
            .delete_appointment(id)
            .await?
            .ok_or(BookingError::AppointmentNotFound(id))?;
        tracing::info!(
            %id,
            date = %appointment.date,
            time = %appointment.time,
            "appointment cancelled"
        );
        Ok(appointment)
    }

    /// Applies a partial change to an appointment.
    ///
    /// The merged record is re-validated; when the `(date, time)` pair
    /// changes, uniqueness is re-checked against all *other* appointments
    /// and slot consumption moves with the record, both inside one atomic
    /// store operation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::AppointmentNotFound`] for an unknown id,
    /// [`BookingError::Validation`] / [`BookingError::InvalidTimeLabel`]
    /// for a bad merged record, [`BookingError::SlotConflict`] when the
    /// target slot is held by another appointment, or a store-class error
    /// on backend failure.
    pub async fn update(
        &self,
        id: AppointmentId,
        change: AppointmentChange,
    ) -> Result<Appointment, BookingError> {
        let current = self
            .store
            .fetch_appointment(id)
            .await?
            .ok_or(BookingError::AppointmentNotFound(id))?;
        let merged = change.apply(&current)?;
        let stored = self
            .store
            .replace_appointment(merged)
            .await?
            .ok_or(BookingError::AppointmentNotFound(id))?;
        tracing::info!(
            %id,
            date = %stored.date,
            time = %stored.time,
            "appointment updated"
        );
        Ok(stored)
    }

    /// Enqueues the confirmation send on a detached task. Clients without
    /// an email on file are skipped; transport failures are logged and
    /// swallowed.
    fn dispatch_confirmation(&self, appointment: &Appointment) {
        let Some(email) = appointment.client_email.clone() else {
            tracing::debug!(id = %appointment.id, "no email on file; skipping confirmation");
            return;
        };
        let (subject, body) = confirmation_message(appointment);
        let notifier = Arc::clone(&self.notifier);
        let id = appointment.id;
        tokio::spawn(async move {
            if let Err(err) = notifier.send(&email, &subject, &body).await {
                tracing::warn!(%id, error = %err, "confirmation notification failed");
            }
        });
    }
}
