//! Account use-case service.

use crate::model::account::{AccountFields, AccountId, AccountRecord};
use crate::repo::account_repo::AccountRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Account service facade.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new account.
    pub fn create_account(&self, fields: &AccountFields) -> ServiceResult<AccountRecord> {
        let normalized = fields.normalized()?;
        let id = self.repo.create_account(&normalized)?;
        info!(
            "event=account_created module=service account_id={id} role={}",
            normalized.role
        );
        self.repo
            .get_account(id)?
            .ok_or(ServiceError::InconsistentState(
                "created account not found in read-back",
            ))
    }

    pub fn get_account(&self, id: AccountId) -> ServiceResult<AccountRecord> {
        self.repo.get_account(id)?.ok_or(ServiceError::NotFound {
            entity: "account",
            id,
        })
    }

    pub fn list_accounts(&self) -> ServiceResult<Vec<AccountRecord>> {
        Ok(self.repo.list_accounts()?)
    }
}
