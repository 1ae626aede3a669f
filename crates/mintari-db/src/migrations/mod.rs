//! Embedded schema migrations.
//!
//! Each migration is recorded in `schema_migrations` once applied; opening an
//! existing database only applies what it has not seen yet.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {version} ({name}) failed: {source}")]
    Failed {
        version: i64,
        name: &'static str,
        source: rusqlite::Error,
    },
}

/// `(version, name, sql)`, in ascending version order.
const MIGRATIONS: &[(i64, &str, &str)] = &[(1, "image_records", include_str!("001_initial.sql"))];

/// Apply every pending migration, each inside its own transaction.
///
/// Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let applied: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    let mut count = 0;
    for &(version, name, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > applied) {
        let failed = |source| MigrationError::Failed {
            version,
            name,
            source,
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![version, name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;
        count += 1;
    }

    Ok(count)
}
