//! Validated time-of-day slot labels.
//!
//! [`SlotTime`] is a newtype around a `"HH:MM"` 24-hour label. Slots are
//! discrete vocabulary items, not continuous timestamps: `"09:00"` names a
//! bookable position in the day, and two labels are the same slot exactly
//! when the strings are equal. Zero-padded labels also give the correct
//! chronological order under plain string comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// A time-of-day slot label (`"HH:MM"`, 24-hour, zero-padded).
///
/// Construct via [`SlotTime::parse`]; the inner string is guaranteed
/// well-formed afterwards. Ordering is chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotTime(String);

impl SlotTime {
    /// Parses and validates a `"HH:MM"` label.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimeLabel`] unless the input is exactly
    /// five characters, zero-padded, with hour in `00..=23` and minute in
    /// `00..=59`.
    pub fn parse(label: &str) -> Result<Self, BookingError> {
        let invalid = || BookingError::InvalidTimeLabel(label.to_string());

        let bytes = label.as_bytes();
        if bytes.len() != 5 || bytes.get(2) != Some(&b':') {
            return Err(invalid());
        }
        // All-digit check also rejects "+1:00" style signs that u8::parse
        // would accept.
        if !bytes.iter().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u8 = label.get(..2).and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        let minute: u8 = label.get(3..).and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self(label.to_string()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SlotTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_labels() {
        for label in ["00:00", "09:00", "12:30", "23:59"] {
            assert!(SlotTime::parse(label).is_ok(), "{label} should parse");
        }
    }

    #[test]
    fn rejects_malformed_labels() {
        for label in ["", "9:00", "09:0", "24:00", "12:60", "ab:cd", "09-00", "09:00 ", "+9:00"] {
            assert!(SlotTime::parse(label).is_err(), "{label} should be rejected");
        }
    }

    #[test]
    fn orders_chronologically() {
        let Ok(early) = SlotTime::parse("09:00") else {
            panic!("valid label");
        };
        let Ok(late) = SlotTime::parse("10:30") else {
            panic!("valid label");
        };
        assert!(early < late);
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<SlotTime, _> = serde_json::from_str("\"14:00\"");
        assert!(ok.is_ok());
        let bad: Result<SlotTime, _> = serde_json::from_str("\"25:00\"");
        assert!(bad.is_err());
    }

    #[test]
    fn display_is_the_label() {
        let Ok(slot) = SlotTime::parse("08:15") else {
            panic!("valid label");
        };
        assert_eq!(slot.to_string(), "08:15");
    }
}
