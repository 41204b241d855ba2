//! Notification channel for booking confirmations.
//!
//! Notifications are best-effort and fire-and-forget: the ledger enqueues a
//! detached task after the booking transaction commits, and a send failure
//! is logged and swallowed. A failed notification never rolls back a
//! booking and never changes the result returned to the caller.

use async_trait::async_trait;

use crate::domain::Appointment;

/// Error returned by a notification transport.
#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound message transport.
///
/// `send` resolves once the message is handed to the transport; delivery
/// beyond that point is not observed.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Sends one message to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the transport rejects the message.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Transport that writes the message to the structured log instead of
/// delivering it. The default for deployments without an outbound mail
/// relay, and a useful tap in development.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(to, subject, body, "confirmation notification");
        Ok(())
    }
}

/// Builds the confirmation subject and body for a booked appointment.
#[must_use]
pub fn confirmation_message(appointment: &Appointment) -> (String, String) {
    let subject = format!(
        "Appointment confirmed for {} at {}",
        appointment.date, appointment.time
    );
    let body = format!(
        "Hello {},\n\nyour appointment for {} on {} at {} is confirmed.\n\
         If you need to change or cancel it, please contact the salon.\n",
        appointment.client_name, appointment.service, appointment.date, appointment.time
    );
    (subject, body)
}
