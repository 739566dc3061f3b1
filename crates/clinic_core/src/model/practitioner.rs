//! Practitioner domain model.
//!
//! # Responsibility
//! - Describe the scalar attributes every practitioner write must resupply.
//! - Describe the nested read shape (practitioner + availability slots).
//!
//! # Invariants
//! - All six scalar fields are required and non-blank; there is no partial
//!   update.
//! - `PractitionerRecord::slots` is never absent; zero availability is an
//!   empty list.

use crate::model::slot::{SlotId, SlotRecord};
use crate::validation::{require_fields, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated practitioner identifier.
pub type PractitionerId = i64;

/// Scalar practitioner attributes, replaced as a whole on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PractitionerFields {
    pub name: String,
    pub specialty: String,
    pub gender: String,
    pub phone: String,
    pub biography: String,
    /// Affiliated facility (hospital or clinic) name.
    pub facility: String,
}

impl PractitionerFields {
    /// Checks that every field is present, in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields([
            ("name", self.name.as_str()),
            ("specialty", self.specialty.as_str()),
            ("gender", self.gender.as_str()),
            ("phone", self.phone.as_str()),
            ("biography", self.biography.as_str()),
            ("facility", self.facility.as_str()),
        ])
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            gender: self.gender.trim().to_string(),
            phone: self.phone.trim().to_string(),
            biography: self.biography.trim().to_string(),
            facility: self.facility.trim().to_string(),
        }
    }
}

/// Practitioner read model with its current availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PractitionerRecord {
    pub id: PractitionerId,
    #[serde(flatten)]
    pub fields: PractitionerFields,
    /// Availability slots ordered by slot id.
    pub slots: Vec<SlotRecord>,
}

impl PractitionerRecord {
    /// Returns the ids of the slots this practitioner is available in.
    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }
}
