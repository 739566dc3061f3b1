//! Account model.

use crate::validation::{require_fields, ValidationError};
use serde::Serialize;

/// Store-generated account identifier; also the token subject.
pub type AccountId = i64;

pub const ACCOUNT_ROLES: &[&str] = &["admin", "patient"];

/// Write-side account attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFields {
    pub username: String,
    pub name: String,
    /// `admin` or `patient`.
    pub role: String,
}

impl AccountFields {
    /// Trims every field and lowercases the username and role.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        require_fields([
            ("username", self.username.as_str()),
            ("name", self.name.as_str()),
            ("role", self.role.as_str()),
        ])?;
        let role = self.role.trim().to_lowercase();
        if !ACCOUNT_ROLES.contains(&role.as_str()) {
            return Err(ValidationError::InvalidFormat {
                field: "role",
                expected: "one of admin|patient",
                value: self.role.trim().to_string(),
            });
        }
        Ok(Self {
            username: self.username.trim().to_lowercase(),
            name: self.name.trim().to_string(),
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(rename = "accountId")]
    pub id: AccountId,
    pub username: String,
    pub name: String,
    pub role: String,
}
