//! Account repository.
//!
//! # Responsibility
//! - Insert and read account rows.
//!
//! # Invariants
//! - Usernames are unique; a duplicate insert is a `Conflict`.

use crate::model::account::{AccountFields, AccountId, AccountRecord};
use crate::repo::schema::{ensure_schema, TableSpec};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT id, username, name, role FROM accounts";

const REQUIRED_SCHEMA: &[TableSpec] = &[("accounts", &["id", "username", "name", "role"])];

/// Repository interface for accounts.
pub trait AccountRepository {
    fn create_account(&self, fields: &AccountFields) -> RepoResult<AccountId>;
    fn get_account(&self, id: AccountId) -> RepoResult<Option<AccountRecord>>;
    /// Lists accounts ordered by id.
    fn list_accounts(&self) -> RepoResult<Vec<AccountRecord>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, fields: &AccountFields) -> RepoResult<AccountId> {
        self.conn
            .execute(
                "INSERT INTO accounts (username, name, role) VALUES (?1, ?2, ?3);",
                params![fields.username, fields.name, fields.role],
            )
            .map_err(|err| match RepoError::from(err) {
                RepoError::Conflict(_) => RepoError::Conflict(format!(
                    "username `{}` is already taken.",
                    fields.username
                )),
                other => other,
            })?;
        let id = self.conn.last_insert_rowid();
        debug!("event=account_create module=repo status=ok account_id={id}");
        Ok(id)
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<AccountRecord>> {
        let account = self
            .conn
            .query_row(
                &format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_account_row,
            )
            .optional()?;
        Ok(account)
    }

    fn list_accounts(&self) -> RepoResult<Vec<AccountRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} ORDER BY id ASC;"))?;
        let accounts = stmt
            .query_map([], parse_account_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }
}

fn parse_account_row(row: &Row<'_>) -> rusqlite::Result<AccountRecord> {
    Ok(AccountRecord {
        id: row.get("id")?,
        username: row.get("username")?,
        name: row.get("name")?,
        role: row.get("role")?,
    })
}
