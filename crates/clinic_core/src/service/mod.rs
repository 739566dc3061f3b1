//! Core use-case services.
//!
//! # Responsibility
//! - Validate request data before any repository call.
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository errors into caller-facing semantics.

use crate::repo::RepoError;
use crate::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_service;
pub mod booking_service;
pub mod practitioner_service;
pub mod slot_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error shared by practitioner, slot, booking, and account use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Request data is missing or malformed.
    Validation(ValidationError),
    /// Target row does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Write rejected because other rows still depend on the target.
    Conflict(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write committed but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::UnknownSlots(ids) => Self::Validation(ValidationError::UnknownSlots(ids)),
            RepoError::UnknownPractitioner(id) => {
                Self::Validation(ValidationError::UnknownPractitioner(id))
            }
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Repo(other),
        }
    }
}
