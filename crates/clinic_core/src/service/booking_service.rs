//! Booking use-case service.
//!
//! Bookings carry no availability logic: a booking outside the
//! practitioner's slots, or overlapping another booking, is accepted.

use crate::model::booking::{BookingFields, BookingId, BookingRecord};
use crate::repo::booking_repo::{BookingListQuery, BookingRepository};
use crate::service::{ServiceError, ServiceResult};
use crate::validation::require_fields;
use log::info;

/// Booking service facade.
pub struct BookingService<R: BookingRepository> {
    repo: R,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_booking(&self, fields: &BookingFields) -> ServiceResult<BookingId> {
        let normalized = fields.normalized()?;
        let id = self.repo.create_booking(&normalized)?;
        info!(
            "event=booking_created module=service booking_id={id} practitioner_id={}",
            normalized.practitioner_id
        );
        Ok(id)
    }

    pub fn replace_booking(
        &self,
        id: BookingId,
        fields: &BookingFields,
    ) -> ServiceResult<BookingRecord> {
        let normalized = fields.normalized()?;
        self.repo.replace_booking(id, &normalized)?;
        self.repo
            .get_booking(id)?
            .ok_or(ServiceError::InconsistentState(
                "replaced booking not found in read-back",
            ))
    }

    /// Changes only the status column.
    pub fn update_status(&self, id: BookingId, status: &str) -> ServiceResult<()> {
        require_fields([("status", status)])?;
        self.repo.update_booking_status(id, status.trim())?;
        info!("event=booking_status_changed module=service booking_id={id}");
        Ok(())
    }

    pub fn delete_booking(&self, id: BookingId) -> ServiceResult<()> {
        Ok(self.repo.delete_booking(id)?)
    }

    pub fn get_booking(&self, id: BookingId) -> ServiceResult<BookingRecord> {
        self.repo.get_booking(id)?.ok_or(ServiceError::NotFound {
            entity: "booking",
            id,
        })
    }

    pub fn list_bookings(&self, query: &BookingListQuery) -> ServiceResult<Vec<BookingRecord>> {
        Ok(self.repo.list_bookings(query)?)
    }
}
