//! Appointment booking model.
//!
//! Bookings reference a practitioner by id and an account by the identity
//! gate's subject id. `status` is free text owned by the front desk workflow.

use crate::model::practitioner::PractitionerId;
use crate::validation::{check_calendar_date, normalize_clock_time, require_fields, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated booking identifier.
pub type BookingId = i64;

/// Write-side booking attributes, replaced as a whole on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFields {
    pub account_id: i64,
    pub practitioner_id: PractitionerId,
    /// Appointment day as `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    /// Consultation method, e.g. `onsite` or `video`.
    pub method: String,
    pub status: String,
    pub note: Option<String>,
}

impl BookingFields {
    /// Validates and returns the persisted form.
    ///
    /// A blank note is stored as `NULL`.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.account_id <= 0 {
            return Err(ValidationError::MissingField("accountId"));
        }
        if self.practitioner_id <= 0 {
            return Err(ValidationError::MissingField("practitionerId"));
        }
        require_fields([
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("method", self.method.as_str()),
            ("status", self.status.as_str()),
        ])?;

        Ok(Self {
            account_id: self.account_id,
            practitioner_id: self.practitioner_id,
            date: check_calendar_date("date", &self.date)?,
            time: normalize_clock_time("time", &self.time)?,
            method: self.method.trim().to_string(),
            status: self.status.trim().to_string(),
            note: self
                .note
                .as_deref()
                .map(str::trim)
                .filter(|note| !note.is_empty())
                .map(str::to_string),
        })
    }
}

/// Booking read model joined with practitioner display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: BookingId,
    pub account_id: i64,
    pub practitioner_id: PractitionerId,
    pub practitioner_name: String,
    pub facility: String,
    pub date: String,
    pub time: String,
    pub method: String,
    pub status: String,
    pub note: Option<String>,
}
