//! Slot catalog use-case service.

use crate::model::slot::{SlotFields, SlotId, SlotRecord};
use crate::repo::slot_repo::SlotRepository;
use crate::service::{ServiceError, ServiceResult};

/// Slot catalog service facade.
pub struct SlotService<R: SlotRepository> {
    repo: R,
}

impl<R: SlotRepository> SlotService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new catalog slot.
    pub fn create_slot(&self, fields: &SlotFields) -> ServiceResult<SlotRecord> {
        let normalized = fields.normalized()?;
        let id = self.repo.create_slot(&normalized)?;
        self.read_back(id, "created slot not found in read-back")
    }

    /// Replaces a slot's weekday and window. Practitioners linked to it see
    /// the new window immediately.
    pub fn replace_slot(&self, id: SlotId, fields: &SlotFields) -> ServiceResult<SlotRecord> {
        let normalized = fields.normalized()?;
        self.repo.replace_slot(id, &normalized)?;
        self.read_back(id, "replaced slot not found in read-back")
    }

    pub fn delete_slot(&self, id: SlotId) -> ServiceResult<()> {
        Ok(self.repo.delete_slot(id)?)
    }

    pub fn get_slot(&self, id: SlotId) -> ServiceResult<SlotRecord> {
        self.repo
            .get_slot(id)?
            .ok_or(ServiceError::NotFound { entity: "slot", id })
    }

    pub fn list_slots(&self) -> ServiceResult<Vec<SlotRecord>> {
        Ok(self.repo.list_slots()?)
    }

    fn read_back(&self, id: SlotId, details: &'static str) -> ServiceResult<SlotRecord> {
        self.repo
            .get_slot(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}
