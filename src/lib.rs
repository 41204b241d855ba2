//! # chairtime
//!
//! Appointment booking and slot-availability backend for salon scheduling.
//!
//! Clients book a `(date, time)` slot for a service; the server validates
//! the request, persists the appointment, consumes the matching
//! availability, and sends a best-effort confirmation. An administrative
//! surface configures, per calendar date, which time slots are bookable.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingLedger (service/)
//!     ├── AvailabilityRegistry (service/)
//!     │
//!     ├── BookingStore (persistence/) ── PostgreSQL | in-memory
//!     └── Notifier (notify/)
//! ```
//!
//! The central invariant: at most one appointment per `(date, time)` pair.
//! Bookings run the conflict check, row insert, and slot consumption as one
//! atomic store operation; cancellation reverses it the same way.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod service;
