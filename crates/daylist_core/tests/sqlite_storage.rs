use daylist_core::{
    KeyValueStore, SqliteKeyValueStore, StorageError, StoreError, TaskBoard, TaskDate, TaskStore,
    ToggleOutcome, SLOT_SCHEMA_VERSION, TASKS_STORAGE_KEY,
};

#[test]
fn open_in_memory_creates_slot_table() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();
    let conn = store.connection();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SLOT_SCHEMA_VERSION);

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn open_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!(
            "PRAGMA user_version = {};",
            SLOT_SCHEMA_VERSION + 1
        ))
        .unwrap();
    }

    let err = SqliteKeyValueStore::open(&path).err().unwrap();
    assert!(matches!(
        err,
        StorageError::UnsupportedSchemaVersion { found, supported }
            if found == SLOT_SCHEMA_VERSION + 1 && supported == SLOT_SCHEMA_VERSION
    ));
}

#[test]
fn reopening_file_keeps_existing_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.sqlite3");
    SqliteKeyValueStore::open(&path)
        .unwrap()
        .set("k", "kept")
        .unwrap();

    let store = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("kept"));
}

#[test]
fn slots_upsert_and_remove() {
    let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
    assert_eq!(store.get("k").unwrap(), None);

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn task_collection_survives_reopen_of_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let (first_id, second_id) = {
        let mut store = TaskStore::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
        let first = store.add("Buy milk", "2025-01-10").unwrap();
        let second = store.add("Pay rent", "2025-01-05").unwrap();
        store.set_completed(first.id, true).unwrap();
        (first.id, second.id)
    };

    let store = TaskStore::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, second_id);
    assert_eq!(tasks[1].id, first_id);
    assert!(tasks[1].completed);
}

#[test]
fn corrupt_sqlite_slot_is_recovered_as_empty() {
    let mut storage = SqliteKeyValueStore::open_in_memory().unwrap();
    storage.set(TASKS_STORAGE_KEY, "{\"broken\":").unwrap();

    let mut board = TaskBoard::open(storage).unwrap();
    assert!(board.store().tasks().is_empty());
    assert!(matches!(
        board.store().load(),
        Err(StoreError::CorruptData(_))
    ));

    board.submit_task("recovered", "2025-01-01").unwrap();
    assert_eq!(board.store().load().unwrap().len(), 1);
}

#[test]
fn clear_deletes_slot_row() {
    let mut store = TaskStore::open(SqliteKeyValueStore::open_in_memory().unwrap()).unwrap();
    store.add("a", "2025-01-01").unwrap();
    store.clear().unwrap();

    assert_eq!(store.storage().get(TASKS_STORAGE_KEY).unwrap(), None);
    let rows: i64 = store
        .storage()
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn toggle_sees_writes_made_through_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");
    let today = TaskDate::parse("2025-01-10").unwrap();

    let mut board = TaskBoard::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
    let mut other = TaskStore::open(SqliteKeyValueStore::open(&path).unwrap()).unwrap();
    let task = other.add("written elsewhere", "2025-01-10").unwrap();
    assert!(board.store().get(task.id).is_none());

    let outcome = board
        .request_toggle_complete(task.id, today, |_| panic!("same-day toggle needs no prompt"))
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Completed);
    assert!(other.load().unwrap()[0].completed);

    other.remove(task.id).unwrap();
    let err = board
        .request_toggle_complete(task.id, today, |_| true)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == task.id));
}
