//! Per-date availability schedules.
//!
//! A [`DaySchedule`] is the set of bookable time slots an administrator has
//! configured for one calendar date. The slot list is kept normalized
//! (sorted ascending, duplicate-free) so that set arithmetic and wire output
//! are deterministic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SlotTime;

/// The configured set of bookable slots for a single calendar date.
///
/// Booking a slot removes its label from `slots`; cancellation re-inserts
/// it. Construction normalizes the list, so duplicates passed by callers
/// are silently collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Calendar date this schedule applies to.
    pub date: NaiveDate,
    /// Ordered, duplicate-free slot labels currently offered.
    pub slots: Vec<SlotTime>,
}

impl DaySchedule {
    /// Creates a schedule, sorting `slots` ascending and collapsing
    /// duplicates.
    #[must_use]
    pub fn new(date: NaiveDate, mut slots: Vec<SlotTime>) -> Self {
        slots.sort();
        slots.dedup();
        Self { date, slots }
    }

    /// Returns `true` if `time` is currently offered.
    #[must_use]
    pub fn contains(&self, time: &SlotTime) -> bool {
        self.slots.binary_search(time).is_ok()
    }

    /// Removes `time` from the offered set.
    ///
    /// Returns `true` if the label was present. Removing an absent label is
    /// a no-op returning `false`, never an error.
    pub fn consume(&mut self, time: &SlotTime) -> bool {
        match self.slots.binary_search(time) {
            Ok(idx) => {
                self.slots.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Re-inserts `time` at its sorted position.
    ///
    /// Idempotent: restoring an already-present label leaves the set
    /// unchanged.
    pub fn restore(&mut self, time: &SlotTime) {
        if let Err(idx) = self.slots.binary_search(time) {
            self.slots.insert(idx, time.clone());
        }
    }

    /// Returns the offered slots minus every label in `taken`, preserving
    /// order.
    #[must_use]
    pub fn minus(&self, taken: &[SlotTime]) -> Vec<SlotTime> {
        self.slots
            .iter()
            .filter(|slot| !taken.contains(slot))
            .cloned()
            .collect()
    }
}
