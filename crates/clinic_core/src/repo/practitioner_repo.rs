//! Practitioner/availability repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist practitioner rows together with their slot associations.
//! - Reassemble the nested practitioner + slot-list read shape, for one
//!   practitioner or for all of them in a batched join.
//!
//! # Invariants
//! - Create, replace, and delete each run in one `IMMEDIATE` transaction;
//!   readers never observe a practitioner with a half-written slot set.
//! - Get and list read the practitioner rows and their slot joins inside one
//!   deferred transaction, so both come from the same snapshot.
//! - Slot ids arrive distinct and positive; the service normalizes them with
//!   `validation::normalize_slot_ids` before any write.
//! - After a write commits, the association set equals the supplied slot ids.
//! - Associations are removed before their practitioner row.
//! - Listing issues one association query per `SQL_VARIABLE_CHUNK`
//!   practitioners, never one per practitioner.

use crate::model::practitioner::{PractitionerFields, PractitionerId, PractitionerRecord};
use crate::model::slot::{SlotId, SlotRecord};
use crate::repo::schema::{ensure_schema, TableSpec};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::collections::{HashMap, HashSet};

const PRACTITIONER_SELECT_SQL: &str = "SELECT
    id,
    name,
    specialty,
    gender,
    phone,
    biography,
    facility
FROM practitioners";

const LINKED_SLOT_SELECT_SQL: &str = "SELECT
    ps.practitioner_id,
    s.id AS slot_id,
    s.weekday,
    s.start_time,
    s.end_time
FROM practitioner_slots ps
INNER JOIN slots s ON s.id = ps.slot_id";

/// Upper bound of bind variables per statement. SQLite builds before 3.32
/// cap host parameters at 999.
const SQL_VARIABLE_CHUNK: usize = 500;

const REQUIRED_SCHEMA: &[TableSpec] = &[
    (
        "practitioners",
        &["id", "name", "specialty", "gender", "phone", "biography", "facility"],
    ),
    ("slots", &["id", "weekday", "start_time", "end_time"]),
    ("practitioner_slots", &["practitioner_id", "slot_id"]),
];

/// Repository interface for practitioners and their availability.
pub trait PractitionerRepository {
    /// Inserts a practitioner and links it to `slot_ids`, which must be
    /// distinct. Returns the new id.
    fn create_practitioner(
        &mut self,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> RepoResult<PractitionerId>;
    /// Overwrites every scalar field and replaces the whole slot set.
    fn replace_practitioner(
        &mut self,
        id: PractitionerId,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> RepoResult<()>;
    /// Removes the practitioner and all of its slot links.
    fn delete_practitioner(&mut self, id: PractitionerId) -> RepoResult<()>;
    /// Gets one practitioner with its slots.
    fn get_practitioner(&self, id: PractitionerId) -> RepoResult<Option<PractitionerRecord>>;
    /// Lists all practitioners ordered by id, each with its slots.
    fn list_practitioners(&self) -> RepoResult<Vec<PractitionerRecord>>;
}

/// SQLite-backed practitioner repository.
pub struct SqlitePractitionerRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePractitionerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl PractitionerRepository for SqlitePractitionerRepository<'_> {
    fn create_practitioner(
        &mut self,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> RepoResult<PractitionerId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_slots_exist(&tx, &slot_ids)?;

        tx.execute(
            "INSERT INTO practitioners (
                name,
                specialty,
                gender,
                phone,
                biography,
                facility
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                fields.name,
                fields.specialty,
                fields.gender,
                fields.phone,
                fields.biography,
                fields.facility,
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_links(&tx, id, &slot_ids)?;

        tx.commit()?;
        debug!(
            "event=practitioner_create module=repo status=ok practitioner_id={id} slot_count={}",
            slot_ids.len()
        );
        Ok(id)
    }

    fn replace_practitioner(
        &mut self,
        id: PractitionerId,
        fields: &PractitionerFields,
        slot_ids: &[SlotId],
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE practitioners
             SET
                name = ?1,
                specialty = ?2,
                gender = ?3,
                phone = ?4,
                biography = ?5,
                facility = ?6
             WHERE id = ?7;",
            params![
                fields.name,
                fields.specialty,
                fields.gender,
                fields.phone,
                fields.biography,
                fields.facility,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "practitioner",
                id,
            });
        }

        ensure_slots_exist(&tx, &slot_ids)?;
        let unlinked = tx.execute(
            "DELETE FROM practitioner_slots WHERE practitioner_id = ?1;",
            [id],
        )?;
        insert_links(&tx, id, &slot_ids)?;

        tx.commit()?;
        debug!(
            "event=practitioner_replace module=repo status=ok practitioner_id={id} unlinked={unlinked} linked={}",
            slot_ids.len()
        );
        Ok(())
    }

    fn delete_practitioner(&mut self, id: PractitionerId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let unlinked = tx.execute(
            "DELETE FROM practitioner_slots WHERE practitioner_id = ?1;",
            [id],
        )?;
        let deleted = tx.execute("DELETE FROM practitioners WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound {
                entity: "practitioner",
                id,
            });
        }

        tx.commit()?;
        debug!(
            "event=practitioner_delete module=repo status=ok practitioner_id={id} unlinked={unlinked}"
        );
        Ok(())
    }

    fn get_practitioner(&self, id: PractitionerId) -> RepoResult<Option<PractitionerRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let fields = tx
            .query_row(
                &format!("{PRACTITIONER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_practitioner_row,
            )
            .optional()?;

        let Some((id, fields)) = fields else {
            return Ok(None);
        };
        let slots = load_slots_for_practitioner(&tx, id)?;
        tx.commit()?;
        Ok(Some(PractitionerRecord { id, fields, slots }))
    }

    fn list_practitioners(&self) -> RepoResult<Vec<PractitionerRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = {
            let mut stmt = tx.prepare(&format!("{PRACTITIONER_SELECT_SQL} ORDER BY id ASC;"))?;
            let rows = stmt
                .query_map([], parse_practitioner_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let ids: Vec<PractitionerId> = rows.iter().map(|(id, _)| *id).collect();
        let mut slots_by_practitioner = load_slots_for_practitioners(&tx, &ids)?;
        tx.commit()?;

        Ok(rows
            .into_iter()
            .map(|(id, fields)| PractitionerRecord {
                id,
                fields,
                slots: slots_by_practitioner.remove(&id).unwrap_or_default(),
            })
            .collect())
    }
}

fn parse_practitioner_row(
    row: &Row<'_>,
) -> rusqlite::Result<(PractitionerId, PractitionerFields)> {
    Ok((
        row.get("id")?,
        PractitionerFields {
            name: row.get("name")?,
            specialty: row.get("specialty")?,
            gender: row.get("gender")?,
            phone: row.get("phone")?,
            biography: row.get("biography")?,
            facility: row.get("facility")?,
        },
    ))
}

fn parse_linked_slot_row(row: &Row<'_>) -> rusqlite::Result<(PractitionerId, SlotRecord)> {
    Ok((
        row.get("practitioner_id")?,
        SlotRecord {
            id: row.get("slot_id")?,
            day: row.get("weekday")?,
            start: row.get("start_time")?,
            end: row.get("end_time")?,
        },
    ))
}

fn load_slots_for_practitioner(
    conn: &Connection,
    id: PractitionerId,
) -> RepoResult<Vec<SlotRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{LINKED_SLOT_SELECT_SQL}
         WHERE ps.practitioner_id = ?1
         ORDER BY s.id ASC;"
    ))?;
    let slots = stmt
        .query_map([id], parse_linked_slot_row)?
        .map(|row| row.map(|(_, slot)| slot))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(slots)
}

/// Loads the slot lists of many practitioners with one `IN (...)` join per
/// chunk and groups them by practitioner id.
fn load_slots_for_practitioners(
    conn: &Connection,
    ids: &[PractitionerId],
) -> RepoResult<HashMap<PractitionerId, Vec<SlotRecord>>> {
    let mut grouped: HashMap<PractitionerId, Vec<SlotRecord>> = HashMap::new();
    for chunk in ids.chunks(SQL_VARIABLE_CHUNK) {
        let mut stmt = conn.prepare(&format!(
            "{LINKED_SLOT_SELECT_SQL}
             WHERE ps.practitioner_id IN ({})
             ORDER BY ps.practitioner_id ASC, s.id ASC;",
            placeholders(chunk.len())
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk))?;
        while let Some(row) = rows.next()? {
            let (practitioner_id, slot) = parse_linked_slot_row(row)?;
            grouped.entry(practitioner_id).or_default().push(slot);
        }
    }
    Ok(grouped)
}

/// Fails with `UnknownSlots` listing every id absent from the catalog.
fn ensure_slots_exist(tx: &Transaction<'_>, slot_ids: &[SlotId]) -> RepoResult<()> {
    let mut found = HashSet::with_capacity(slot_ids.len());
    for chunk in slot_ids.chunks(SQL_VARIABLE_CHUNK) {
        let mut stmt = tx.prepare(&format!(
            "SELECT id FROM slots WHERE id IN ({});",
            placeholders(chunk.len())
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk))?;
        while let Some(row) = rows.next()? {
            found.insert(row.get::<_, SlotId>(0)?);
        }
    }

    let missing: Vec<SlotId> = slot_ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RepoError::UnknownSlots(missing))
    }
}

/// Links `slot_ids` to the practitioner with multi-row inserts. `?1` carries
/// the practitioner id in every row tuple.
fn insert_links(tx: &Transaction<'_>, id: PractitionerId, slot_ids: &[SlotId]) -> RepoResult<()> {
    for chunk in slot_ids.chunks(SQL_VARIABLE_CHUNK - 1) {
        let values = (0..chunk.len())
            .map(|idx| format!("(?1, ?{})", idx + 2))
            .collect::<Vec<_>>()
            .join(", ");
        tx.execute(
            &format!("INSERT INTO practitioner_slots (practitioner_id, slot_id) VALUES {values};"),
            params_from_iter(std::iter::once(id).chain(chunk.iter().copied())),
        )?;
    }
    Ok(())
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::placeholders;

    #[test]
    fn placeholders_are_comma_separated() {
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(1), "?");
    }
}
