//! Connection bootstrap for the embedded SQLite store. The whole persistent
//! state of the application is one string-keyed slot, so the schema is a
//! single `kv` table rather than anything relational.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Ensure the database file exists, apply the schema, and return a live
/// connection. Parent directories are created on demand so a fresh install
/// works without any manual setup.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Create the key-value table when it does not exist yet. Split out from
/// [`ensure_schema`] so tests can run against an in-memory connection.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv table")?;

    Ok(())
}
