//! Core domain logic for the clinic booking backend.
//! This crate is the single source of truth for availability invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::account::{AccountFields, AccountId, AccountRecord};
pub use model::booking::{BookingFields, BookingId, BookingRecord};
pub use model::practitioner::{PractitionerFields, PractitionerId, PractitionerRecord};
pub use model::slot::{SlotFields, SlotId, SlotRecord};
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::booking_repo::{BookingListQuery, BookingRepository, SqliteBookingRepository};
pub use repo::practitioner_repo::{PractitionerRepository, SqlitePractitionerRepository};
pub use repo::slot_repo::{SlotRepository, SqliteSlotRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::booking_service::BookingService;
pub use service::practitioner_service::PractitionerService;
pub use service::slot_service::SlotService;
pub use service::{ServiceError, ServiceResult};
pub use validation::ValidationError;

/// Minimal health-check API used by the HTTP layer's liveness route.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
