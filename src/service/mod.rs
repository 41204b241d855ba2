//! Service layer: availability registry and booking ledger.
//!
//! Both services are stateless coordinators over the injected store handle;
//! the registry owns the administrative schedule surface, the ledger owns
//! the appointment lifecycle and the slot-uniqueness invariant.

pub mod availability;
pub mod booking;

pub use availability::AvailabilityRegistry;
pub use booking::BookingLedger;
