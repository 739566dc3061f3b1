//! Schema readiness probes run when a repository is constructed.

use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Table name paired with the columns a repository reads or writes.
pub(crate) type TableSpec = (&'static str, &'static [&'static str]);

/// Fails fast when a connection was not migrated to the expected schema.
pub(crate) fn ensure_schema(conn: &Connection, tables: &[TableSpec]) -> RepoResult<()> {
    for &(table, columns) in tables {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            return Err(RepoError::MissingRequiredTable(table));
        }
        if let Some(&column) = columns
            .iter()
            .find(|&&column| !present.iter().any(|c| c == column))
        {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::ensure_schema;
    use crate::db::open_db_in_memory;
    use crate::repo::RepoError;

    #[test]
    fn reports_missing_table_and_column() {
        let conn = open_db_in_memory().unwrap();

        let err = ensure_schema(&conn, &[("rooms", &["id"])]).unwrap_err();
        assert!(matches!(err, RepoError::MissingRequiredTable("rooms")));

        let err = ensure_schema(&conn, &[("slots", &["id", "capacity"])]).unwrap_err();
        assert!(matches!(
            err,
            RepoError::MissingRequiredColumn {
                table: "slots",
                column: "capacity"
            }
        ));

        ensure_schema(&conn, &[("slots", &["id", "weekday"])]).unwrap();
    }
}
