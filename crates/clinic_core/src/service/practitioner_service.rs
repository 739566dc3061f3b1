//! Practitioner availability use-case service.
//!
//! # Responsibility
//! - Validate practitioner writes: required scalar fields first, then the
//!   slot-id list.
//! - Return the nested practitioner + slots record after replace.
//!
//! # Invariants
//! - Creation requires at least one slot; replacement accepts an empty list
//!   and clears availability.
//! - Duplicate slot ids collapse to one association.

use crate::model::practitioner::{PractitionerFields, PractitionerId, PractitionerRecord};
use crate::model::slot::SlotId;
use crate::repo::practitioner_repo::PractitionerRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::validation::{normalize_slot_ids, ValidationError};
use log::info;

/// Practitioner service facade over repository implementations.
pub struct PractitionerService<R: PractitionerRepository> {
    repo: R,
}

impl<R: PractitionerRepository> PractitionerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one practitioner available in `slot_ids`.
    pub fn create_practitioner(
        &mut self,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> ServiceResult<PractitionerId> {
        let fields = checked_fields(fields)?;
        let slot_ids = normalize_slot_ids(slot_ids)?;
        if slot_ids.is_empty() {
            return Err(ValidationError::EmptySlotList.into());
        }

        let id = self.repo.create_practitioner(&fields, &slot_ids)?;
        info!(
            "event=practitioner_created module=service practitioner_id={id} slot_count={}",
            slot_ids.len()
        );
        Ok(id)
    }

    /// Replaces every field and the full slot set, then reads the result back.
    pub fn replace_practitioner(
        &mut self,
        id: PractitionerId,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> ServiceResult<PractitionerRecord> {
        let fields = checked_fields(fields)?;
        let slot_ids = normalize_slot_ids(slot_ids)?;

        self.repo.replace_practitioner(id, &fields, &slot_ids)?;
        info!(
            "event=practitioner_replaced module=service practitioner_id={id} slot_count={}",
            slot_ids.len()
        );
        self.repo
            .get_practitioner(id)?
            .ok_or(ServiceError::InconsistentState(
                "replaced practitioner not found in read-back",
            ))
    }

    /// Deletes a practitioner together with its availability.
    pub fn delete_practitioner(&mut self, id: PractitionerId) -> ServiceResult<()> {
        self.repo.delete_practitioner(id)?;
        info!("event=practitioner_deleted module=service practitioner_id={id}");
        Ok(())
    }

    /// Gets one practitioner; absence is `NotFound`.
    pub fn get_practitioner(&self, id: PractitionerId) -> ServiceResult<PractitionerRecord> {
        self.repo
            .get_practitioner(id)?
            .ok_or(ServiceError::NotFound {
                entity: "practitioner",
                id,
            })
    }

    /// Lists every practitioner with its slots.
    pub fn list_practitioners(&self) -> ServiceResult<Vec<PractitionerRecord>> {
        Ok(self.repo.list_practitioners()?)
    }
}

fn checked_fields(fields: &PractitionerFields) -> Result<PractitionerFields, ValidationError> {
    let trimmed = fields.trimmed();
    trimmed.validate()?;
    Ok(trimmed)
}
