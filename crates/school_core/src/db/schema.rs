//! School schema bootstrap.
//!
//! There is exactly one schema version. A fresh database gets the whole
//! schema in one transaction; a database already at this version is left
//! untouched; a newer one is refused.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Tables the school store relies on.
pub const TABLES: [&str; 4] = ["student", "course", "student_course", "grade"];

/// Creates the school tables if the database has not been bootstrapped yet.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
