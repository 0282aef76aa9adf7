//! Schema creation and version tracking.

use rusqlite::{Connection, OptionalExtension, params};

use super::StorageError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    author TEXT NOT NULL,
    source TEXT,
    year INTEGER,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS quote_tags (
    quote_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (quote_id, tag_id),
    FOREIGN KEY (quote_id) REFERENCES quotes(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author);
CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
";

/// Enable per-connection settings the schema relies on.
pub(crate) fn configure_connection(conn: &Connection) -> Result<(), StorageError> {
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(())
}

/// Create every table and index, then reconcile the recorded schema version.
///
/// Safe to call on an initialized database.
pub fn init_schema(conn: &mut Connection) -> Result<(), StorageError> {
    let current = schema_version(conn)?;
    match current {
        Some(version) if version > SCHEMA_VERSION => {
            return Err(StorageError::UnsupportedMigration {
                from: version,
                to: SCHEMA_VERSION,
            });
        }
        Some(version) if version < SCHEMA_VERSION => migrate(conn, version, SCHEMA_VERSION)?,
        _ => {}
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLES)?;
    let recorded: Option<i64> = tx
        .query_row(
            "SELECT version FROM schema_version WHERE version = ?1",
            params![SCHEMA_VERSION],
            |row| row.get(0),
        )
        .optional()?;
    if recorded.is_none() {
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        tracing::info!(version = SCHEMA_VERSION, "Recorded schema version");
    }
    tx.commit()?;
    tracing::debug!(version = SCHEMA_VERSION, "Schema ready");
    Ok(())
}

/// Highest applied schema version, or `None` when the database has not been initialized.
pub fn schema_version(conn: &Connection) -> Result<Option<i64>, StorageError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }
    let version: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;
    Ok(version)
}

/// Upgrade the schema between two versions.
///
/// Only version 1 exists, so every real migration request is rejected.
pub fn migrate(_conn: &mut Connection, from: i64, to: i64) -> Result<(), StorageError> {
    if from == to {
        return Ok(());
    }
    tracing::error!(from, to, "No migration path between schema versions");
    Err(StorageError::UnsupportedMigration { from, to })
}
