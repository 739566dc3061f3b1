//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for practitioners,
//!   catalog slots, bookings, and accounts.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Multi-statement writes run inside one `IMMEDIATE` transaction.
//! - Repository APIs return semantic errors (`NotFound`, `UnknownSlots`,
//!   `Conflict`) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::practitioner::PractitionerId;
use crate::model::slot::SlotId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod booking_repo;
pub mod practitioner_repo;
mod schema;
pub mod slot_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Target row does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Referenced catalog slots do not exist.
    UnknownSlots(Vec<SlotId>),
    /// Referenced practitioner does not exist.
    UnknownPractitioner(PractitionerId),
    /// Write rejected by a storage constraint.
    Conflict(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::UnknownSlots(ids) => write!(f, "unknown slot ids: {ids:?}"),
            Self::UnknownPractitioner(id) => write!(f, "unknown practitioner id: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_constraint_violation() {
            Self::Conflict(value.to_string())
        } else {
            Self::Db(value)
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}
