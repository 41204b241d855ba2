//! Domain layer: appointment records, slot labels, and per-date schedules.
//!
//! This module contains the core booking model: validated time-slot labels,
//! the appointment lifecycle types (raw request, validated draft, stored
//! record, partial change), and the normalized per-date availability set.

pub mod appointment;
pub mod schedule;
pub mod slot;

pub use appointment::{
    Appointment, AppointmentChange, AppointmentDraft, AppointmentId, BookingRequest,
};
pub use schedule::DaySchedule;
pub use slot::SlotTime;
