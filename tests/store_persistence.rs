//! End-to-end persistence checks over a real database file: what one process
//! writes, the next one reads back unchanged.

use inward_register::{ensure_schema, Record, RecordStore, Status};
use rusqlite::params;

fn sample(reel: &str, weight: f64, zone: &str) -> Record {
    Record::new(reel.to_string(), weight, zone.to_string())
}

#[test]
fn appended_records_survive_a_reopen_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("inward.sqlite");

    let mut store = RecordStore::open(ensure_schema(&db_path).unwrap());
    assert!(store.is_empty());
    store.append(sample("R1", 12.5, "A")).unwrap();
    store.append(sample("R2", 7.0, "B")).unwrap();
    store.append(sample("R3", 0.25, "A")).unwrap();
    let written: Vec<Record> = store.records().to_vec();
    drop(store);

    let reopened = RecordStore::open(ensure_schema(&db_path).unwrap());
    assert_eq!(reopened.records(), written.as_slice());
}

#[test]
fn submitted_entry_matches_the_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("inward.sqlite");

    let mut store = RecordStore::open(ensure_schema(&db_path).unwrap());
    store.append(sample("R1", 12.5, "A")).unwrap();

    let record = &store.records()[0];
    assert_eq!(record.status, Status::Pending);
    assert_eq!(record.weight_display(), "12.5 kg");
    // Stamped display formats: DD/MM/YYYY and HH:MM.
    assert_eq!(record.date.len(), 10);
    assert_eq!(&record.date[2..3], "/");
    assert_eq!(record.time.len(), 5);
    assert_eq!(&record.time[2..3], ":");
}

#[test]
fn malformed_slot_on_disk_loads_as_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("inward.sqlite");

    let conn = ensure_schema(&db_path).unwrap();
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)",
        params!["inward_records", "definitely not json"],
    )
    .unwrap();
    drop(conn);

    let store = RecordStore::open(ensure_schema(&db_path).unwrap());
    assert!(store.is_empty());
}

#[test]
fn foreign_status_text_round_trips_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("inward.sqlite");

    let mut store = RecordStore::open(ensure_schema(&db_path).unwrap());
    let mut record = sample("R9", 4.0, "C");
    record.status = Status::Other("On Hold".to_string());
    store.append(record).unwrap();
    drop(store);

    let reopened = RecordStore::open(ensure_schema(&db_path).unwrap());
    assert_eq!(
        reopened.records()[0].status,
        Status::Other("On Hold".to_string())
    );
}
