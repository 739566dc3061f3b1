//! Weekly slot catalog model.

use crate::validation::{normalize_clock_time, normalize_weekday, require_fields, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated slot identifier.
pub type SlotId = i64;

/// Write-side slot attributes as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFields {
    /// Weekday name, e.g. `monday`.
    pub day: String,
    pub start: String,
    pub end: String,
}

impl SlotFields {
    /// Validates and returns the persisted form: lowercase weekday and
    /// `HH:MM:SS` times with `start < end`.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        require_fields([
            ("day", self.day.as_str()),
            ("start", self.start.as_str()),
            ("end", self.end.as_str()),
        ])?;
        let day = normalize_weekday("day", &self.day)?;
        let start = normalize_clock_time("start", &self.start)?;
        let end = normalize_clock_time("end", &self.end)?;
        if start >= end {
            return Err(ValidationError::InvalidRange(
                "start must be earlier than end.",
            ));
        }
        Ok(Self { day, start, end })
    }
}

/// One catalog slot as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    #[serde(rename = "slotId")]
    pub id: SlotId,
    pub day: String,
    pub start: String,
    pub end: String,
}

impl SlotRecord {
    /// Returns the `(day, start, end)` triple that identifies the window
    /// independently of its catalog id.
    pub fn window(&self) -> (&str, &str, &str) {
        (&self.day, &self.start, &self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_rejects_inverted_window() {
        let fields = SlotFields {
            day: "Monday".to_string(),
            start: "10:00".to_string(),
            end: "09:00".to_string(),
        };
        assert!(matches!(
            fields.normalized(),
            Err(ValidationError::InvalidRange(_))
        ));
    }

    #[test]
    fn normalized_checks_required_fields_first() {
        let fields = SlotFields {
            day: String::new(),
            start: "nonsense".to_string(),
            end: String::new(),
        };
        assert_eq!(
            fields.normalized().unwrap_err(),
            ValidationError::MissingField("day")
        );
    }

    #[test]
    fn record_serializes_slot_id_key() {
        let record = SlotRecord {
            id: 5,
            day: "monday".to_string(),
            start: "08:00:00".to_string(),
            end: "12:00:00".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["slotId"], 5);
        assert_eq!(json["day"], "monday");
    }
}
