//! The record store: the one component with a real state-management
//! contract. The entire record list lives under a single fixed key as a JSON
//! array blob, and every append rewrites the whole blob. Loading is
//! deliberately forgiving: a missing or malformed slot comes back as an
//! empty list instead of an error, matching the storage format's history of
//! being hand-edited.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::models::Record;

/// Fixed key of the slot holding the serialized record list.
const STORAGE_KEY: &str = "inward_records";

/// Owns the connection and the in-memory record list. The rendering layer
/// reads through [`RecordStore::records`]; every mutation persists
/// immediately, so the in-memory list and the slot never drift apart.
pub struct RecordStore {
    conn: Connection,
    records: Vec<Record>,
}

impl RecordStore {
    /// Hydrate the store from the slot. Never fails on bad data: a missing
    /// row or an unparsable blob yields an empty list.
    pub fn open(conn: Connection) -> Self {
        let records = load_slot(&conn);
        Self { conn, records }
    }

    /// The current record list, in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record and rewrite the whole slot. There is no partial
    /// write: either the new list lands in the slot or the error bubbles up
    /// with the in-memory list already extended.
    pub fn append(&mut self, record: Record) -> Result<()> {
        self.records.push(record);
        persist_slot(&self.conn, &self.records)
    }
}

/// Read and deserialize the slot, degrading to an empty list on any failure.
fn load_slot(conn: &Connection) -> Vec<Record> {
    let raw: Option<String> = match conn
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()
    {
        Ok(value) => value,
        Err(err) => {
            warn!("could not read the record slot, starting empty: {err}");
            None
        }
    };

    let Some(text) = raw else {
        return Vec::new();
    };

    match serde_json::from_str(&text) {
        Ok(records) => records,
        Err(err) => {
            warn!("stored record list is malformed, starting empty: {err}");
            Vec::new()
        }
    }
}

/// Serialize the full list and overwrite the slot in one statement.
fn persist_slot(conn: &Connection, records: &[Record]) -> Result<()> {
    let blob = serde_json::to_string(records).context("failed to serialize record list")?;
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![STORAGE_KEY, blob],
    )
    .context("failed to persist record list")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::apply_schema;
    use crate::models::{Record, Status};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    fn sample(code: &str, weight: f64) -> Record {
        Record::new(code.to_string(), weight, "A".to_string())
    }

    #[test]
    fn empty_database_loads_as_empty_list() {
        let conn = test_conn();
        assert!(load_slot(&conn).is_empty());
    }

    #[test]
    fn persisted_list_round_trips_in_order() {
        let conn = test_conn();
        let records = vec![sample("R1", 12.5), sample("R2", 7.0), sample("R3", 0.5)];
        persist_slot(&conn, &records).unwrap();
        assert_eq!(load_slot(&conn), records);
    }

    #[test]
    fn malformed_slot_loads_as_empty_list() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)",
            params![STORAGE_KEY, "{not json"],
        )
        .unwrap();
        assert!(load_slot(&conn).is_empty());
    }

    #[test]
    fn append_extends_list_and_slot() {
        let conn = test_conn();
        let mut store = RecordStore::open(conn);
        store.append(sample("R1", 12.5)).unwrap();
        store.append(sample("R2", 7.0)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].reel_code, "R1");
        assert_eq!(store.records()[1].reel_code, "R2");
        assert_eq!(store.records()[0].status, Status::Pending);

        // The slot holds the whole list, not a delta.
        let blob: String = store
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed, store.records);
    }
}
