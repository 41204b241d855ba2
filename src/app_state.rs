//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{AvailabilityRegistry, BookingLedger};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking ledger for the appointment lifecycle.
    pub ledger: Arc<BookingLedger>,
    /// Availability registry for schedule administration and reads.
    pub registry: Arc<AvailabilityRegistry>,
}
