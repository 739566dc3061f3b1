//! Input validation shared by practitioner, slot, and booking writes.
//!
//! # Responsibility
//! - Detect missing required fields before any storage call.
//! - Normalize clock times and slot-id lists into their persisted shape.
//!
//! # Invariants
//! - Required fields are checked in declaration order; the first blank field
//!   is the one reported.
//! - A normalized slot-id list holds only positive, distinct ids in
//!   first-occurrence order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary regex"));
static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::([0-5]\d))?$").expect("valid clock time regex")
});
static CALENDAR_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid calendar date regex")
});

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Request-data validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent or blank.
    MissingField(&'static str),
    /// Creation requires at least one slot id.
    EmptySlotList,
    /// Slot ids must be positive integers.
    InvalidSlotId(i64),
    /// Slot ids that do not exist in the catalog.
    UnknownSlots(Vec<i64>),
    /// Referenced practitioner does not exist.
    UnknownPractitioner(i64),
    /// Field value does not match the expected format.
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    /// Cross-field constraint violated.
    InvalidRange(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{} is required.", friendly_field_name(field)),
            Self::EmptySlotList => write!(f, "slot ids must contain at least one slot."),
            Self::InvalidSlotId(id) => write!(f, "slot id {id} is not a positive integer."),
            Self::UnknownSlots(ids) => {
                let joined = ids
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "unknown slot ids: {joined}.")
            }
            Self::UnknownPractitioner(id) => write!(f, "practitioner {id} does not exist."),
            Self::InvalidFormat {
                field,
                expected,
                value,
            } => write!(
                f,
                "{} must be {expected}, got `{value}`.",
                friendly_field_name(field)
            ),
            Self::InvalidRange(details) => write!(f, "{details}"),
        }
    }
}

impl Error for ValidationError {}

/// Turns a wire field name into message text: `slotIds` -> `slot ids`,
/// `account_id` -> `account id`.
pub fn friendly_field_name(field: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(field, "$1 $2")
        .replace('_', " ")
        .to_lowercase()
}

/// Fails on the first field whose value is blank after trimming.
pub fn require_fields<'a>(
    fields: impl IntoIterator<Item = (&'static str, &'a str)>,
) -> Result<(), ValidationError> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(name));
        }
    }
    Ok(())
}

/// Normalizes `HH:MM` or `HH:MM:SS` (24h) to `HH:MM:SS`.
///
/// The normalized form sorts lexicographically in clock order, which the
/// `slots` table `CHECK (start_time < end_time)` relies on.
pub fn normalize_clock_time(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let caps = CLOCK_TIME_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field,
            expected: "a 24h time as HH:MM or HH:MM:SS",
            value: trimmed.to_string(),
        })?;
    let seconds = caps.get(3).map_or("00", |m| m.as_str());
    Ok(format!("{}:{}:{seconds}", &caps[1], &caps[2]))
}

/// Validates a `YYYY-MM-DD` calendar date.
pub fn check_calendar_date(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if CALENDAR_DATE_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            expected: "a date as YYYY-MM-DD",
            value: trimmed.to_string(),
        })
    }
}

/// Normalizes a weekday name to lowercase English (`Monday` -> `monday`).
pub fn normalize_weekday(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let lowered = value.trim().to_lowercase();
    if WEEKDAYS.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            expected: "a weekday name (monday..sunday)",
            value: value.trim().to_string(),
        })
    }
}

/// Rejects non-positive ids and drops duplicates, keeping first occurrence.
pub fn normalize_slot_ids(slot_ids: &[i64]) -> Result<Vec<i64>, ValidationError> {
    let mut seen = HashSet::with_capacity(slot_ids.len());
    let mut unique = Vec::with_capacity(slot_ids.len());
    for &id in slot_ids {
        if id <= 0 {
            return Err(ValidationError::InvalidSlotId(id));
        }
        if seen.insert(id) {
            unique.push(id);
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_field_name_splits_camel_and_snake_case() {
        assert_eq!(friendly_field_name("slotIds"), "slot ids");
        assert_eq!(friendly_field_name("account_id"), "account id");
        assert_eq!(friendly_field_name("name"), "name");
    }

    #[test]
    fn require_fields_reports_first_blank_field() {
        let err = require_fields([("name", "A"), ("specialty", "  "), ("gender", "")])
            .expect_err("blank specialty must fail");
        assert_eq!(err, ValidationError::MissingField("specialty"));
        assert_eq!(err.to_string(), "specialty is required.");
    }

    #[test]
    fn clock_time_is_padded_with_seconds() {
        assert_eq!(normalize_clock_time("start", "08:30").unwrap(), "08:30:00");
        assert_eq!(normalize_clock_time("end", "23:59:59").unwrap(), "23:59:59");
        assert!(normalize_clock_time("start", "24:00").is_err());
        assert!(normalize_clock_time("start", "8:30").is_err());
    }

    #[test]
    fn calendar_date_rejects_bad_month() {
        assert!(check_calendar_date("date", "2024-02-29").is_ok());
        assert!(check_calendar_date("date", "2024-13-01").is_err());
    }

    #[test]
    fn weekday_is_case_insensitive() {
        assert_eq!(normalize_weekday("day", " Friday ").unwrap(), "friday");
        assert!(normalize_weekday("day", "funday").is_err());
    }

    #[test]
    fn slot_ids_are_deduplicated_in_order() {
        assert_eq!(normalize_slot_ids(&[7, 5, 7, 9, 5]).unwrap(), vec![7, 5, 9]);
        assert_eq!(
            normalize_slot_ids(&[3, 0]).unwrap_err(),
            ValidationError::InvalidSlotId(0)
        );
    }

    #[test]
    fn unknown_slots_message_lists_ids() {
        let err = ValidationError::UnknownSlots(vec![4, 11]);
        assert_eq!(err.to_string(), "unknown slot ids: 4, 11.");
    }
}
