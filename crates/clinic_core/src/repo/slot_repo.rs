//! Slot catalog repository.
//!
//! # Responsibility
//! - CRUD over the shared weekly slot catalog.
//!
//! # Invariants
//! - A slot still linked to any practitioner cannot be deleted.
//! - Persisted times are already normalized to `HH:MM:SS`.

use crate::model::slot::{SlotFields, SlotId, SlotRecord};
use crate::repo::schema::{ensure_schema, TableSpec};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SLOT_SELECT_SQL: &str = "SELECT id, weekday, start_time, end_time FROM slots";

const REQUIRED_SCHEMA: &[TableSpec] = &[
    ("slots", &["id", "weekday", "start_time", "end_time"]),
    ("practitioner_slots", &["practitioner_id", "slot_id"]),
];

/// Repository interface for the slot catalog.
pub trait SlotRepository {
    fn create_slot(&self, fields: &SlotFields) -> RepoResult<SlotId>;
    fn replace_slot(&self, id: SlotId, fields: &SlotFields) -> RepoResult<()>;
    fn delete_slot(&self, id: SlotId) -> RepoResult<()>;
    fn get_slot(&self, id: SlotId) -> RepoResult<Option<SlotRecord>>;
    /// Lists the catalog ordered by id.
    fn list_slots(&self) -> RepoResult<Vec<SlotRecord>>;
}

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn create_slot(&self, fields: &SlotFields) -> RepoResult<SlotId> {
        self.conn.execute(
            "INSERT INTO slots (weekday, start_time, end_time) VALUES (?1, ?2, ?3);",
            params![fields.day, fields.start, fields.end],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn replace_slot(&self, id: SlotId, fields: &SlotFields) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE slots
             SET weekday = ?1, start_time = ?2, end_time = ?3
             WHERE id = ?4;",
            params![fields.day, fields.start, fields.end, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "slot", id });
        }
        Ok(())
    }

    fn delete_slot(&self, id: SlotId) -> RepoResult<()> {
        let linked: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM practitioner_slots WHERE slot_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        if linked > 0 {
            return Err(RepoError::Conflict(format!(
                "slot {id} is still assigned to {linked} practitioner(s)"
            )));
        }

        let deleted = self.conn.execute("DELETE FROM slots WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound { entity: "slot", id });
        }
        Ok(())
    }

    fn get_slot(&self, id: SlotId) -> RepoResult<Option<SlotRecord>> {
        let slot = self
            .conn
            .query_row(
                &format!("{SLOT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_slot_row,
            )
            .optional()?;
        Ok(slot)
    }

    fn list_slots(&self) -> RepoResult<Vec<SlotRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SLOT_SELECT_SQL} ORDER BY id ASC;"))?;
        let slots = stmt
            .query_map([], parse_slot_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }
}

fn parse_slot_row(row: &Row<'_>) -> rusqlite::Result<SlotRecord> {
    Ok(SlotRecord {
        id: row.get("id")?,
        day: row.get("weekday")?,
        start: row.get("start_time")?,
        end: row.get("end_time")?,
    })
}
