//! Booking repository.
//!
//! # Responsibility
//! - Single-row CRUD over `bookings`.
//! - Join practitioner display fields into every read.
//!
//! # Invariants
//! - Writes referencing an unknown practitioner fail with
//!   `UnknownPractitioner` before touching `bookings`.

use crate::model::booking::{BookingFields, BookingId, BookingRecord};
use crate::model::practitioner::PractitionerId;
use crate::repo::schema::{ensure_schema, TableSpec};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const BOOKING_SELECT_SQL: &str = "SELECT
    b.id,
    b.account_id,
    b.practitioner_id,
    p.name AS practitioner_name,
    p.facility,
    b.booking_date,
    b.booking_time,
    b.method,
    b.status,
    b.note
FROM bookings b
INNER JOIN practitioners p ON p.id = b.practitioner_id";

const REQUIRED_SCHEMA: &[TableSpec] = &[
    (
        "bookings",
        &[
            "id",
            "account_id",
            "practitioner_id",
            "booking_date",
            "booking_time",
            "method",
            "status",
            "note",
        ],
    ),
    ("practitioners", &["id", "name", "facility"]),
];

/// Query options for booking lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingListQuery {
    /// Restricts the list to one account.
    pub account_id: Option<i64>,
    /// Restricts the list to one practitioner.
    pub practitioner_id: Option<PractitionerId>,
}

/// Repository interface for bookings.
pub trait BookingRepository {
    fn create_booking(&self, fields: &BookingFields) -> RepoResult<BookingId>;
    fn replace_booking(&self, id: BookingId, fields: &BookingFields) -> RepoResult<()>;
    fn update_booking_status(&self, id: BookingId, status: &str) -> RepoResult<()>;
    fn delete_booking(&self, id: BookingId) -> RepoResult<()>;
    fn get_booking(&self, id: BookingId) -> RepoResult<Option<BookingRecord>>;
    /// Lists bookings by date, time, then id.
    fn list_bookings(&self, query: &BookingListQuery) -> RepoResult<Vec<BookingRecord>>;
}

/// SQLite-backed booking repository.
pub struct SqliteBookingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookingRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }

    fn ensure_practitioner_exists(&self, id: PractitionerId) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM practitioners WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        if exists == 1 {
            Ok(())
        } else {
            Err(RepoError::UnknownPractitioner(id))
        }
    }
}

impl BookingRepository for SqliteBookingRepository<'_> {
    fn create_booking(&self, fields: &BookingFields) -> RepoResult<BookingId> {
        self.ensure_practitioner_exists(fields.practitioner_id)?;
        self.conn.execute(
            "INSERT INTO bookings (
                account_id,
                practitioner_id,
                booking_date,
                booking_time,
                method,
                status,
                note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                fields.account_id,
                fields.practitioner_id,
                fields.date,
                fields.time,
                fields.method,
                fields.status,
                fields.note,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn replace_booking(&self, id: BookingId, fields: &BookingFields) -> RepoResult<()> {
        self.ensure_practitioner_exists(fields.practitioner_id)?;
        let changed = self.conn.execute(
            "UPDATE bookings
             SET
                account_id = ?1,
                practitioner_id = ?2,
                booking_date = ?3,
                booking_time = ?4,
                method = ?5,
                status = ?6,
                note = ?7
             WHERE id = ?8;",
            params![
                fields.account_id,
                fields.practitioner_id,
                fields.date,
                fields.time,
                fields.method,
                fields.status,
                fields.note,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "booking",
                id,
            });
        }
        Ok(())
    }

    fn update_booking_status(&self, id: BookingId, status: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE bookings SET status = ?1 WHERE id = ?2;",
            params![status, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "booking",
                id,
            });
        }
        Ok(())
    }

    fn delete_booking(&self, id: BookingId) -> RepoResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM bookings WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound {
                entity: "booking",
                id,
            });
        }
        Ok(())
    }

    fn get_booking(&self, id: BookingId) -> RepoResult<Option<BookingRecord>> {
        let booking = self
            .conn
            .query_row(
                &format!("{BOOKING_SELECT_SQL} WHERE b.id = ?1;"),
                [id],
                parse_booking_row,
            )
            .optional()?;
        Ok(booking)
    }

    fn list_bookings(&self, query: &BookingListQuery) -> RepoResult<Vec<BookingRecord>> {
        let mut sql = format!("{BOOKING_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(account_id) = query.account_id {
            sql.push_str(" AND b.account_id = ?");
            bind_values.push(Value::Integer(account_id));
        }
        if let Some(practitioner_id) = query.practitioner_id {
            sql.push_str(" AND b.practitioner_id = ?");
            bind_values.push(Value::Integer(practitioner_id));
        }
        sql.push_str(" ORDER BY b.booking_date ASC, b.booking_time ASC, b.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let bookings = stmt
            .query_map(params_from_iter(bind_values), parse_booking_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }
}

fn parse_booking_row(row: &Row<'_>) -> rusqlite::Result<BookingRecord> {
    Ok(BookingRecord {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        practitioner_id: row.get("practitioner_id")?,
        practitioner_name: row.get("practitioner_name")?,
        facility: row.get("facility")?,
        date: row.get("booking_date")?,
        time: row.get("booking_time")?,
        method: row.get("method")?,
        status: row.get("status")?,
        note: row.get("note")?,
    })
}
