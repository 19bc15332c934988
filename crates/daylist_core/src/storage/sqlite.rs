//! SQLite-backed slot storage.
//!
//! # Responsibility
//! - Persist each slot as one row of `kv_slots`.
//! - Create the `kv_slots` table on first open of a database file.
//!
//! # Invariants
//! - A store is only handed out once `kv_slots` exists at
//!   [`SLOT_SCHEMA_VERSION`], tracked in `PRAGMA user_version`.
//! - Files stamped with a newer version are refused, never rewritten.
//! - `set` is an upsert; the row holds the latest full value only.

use super::{KeyValueStore, StorageError, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// `PRAGMA user_version` stamped on databases holding `kv_slots`.
pub const SLOT_SCHEMA_VERSION: u32 = 1;

const KV_SLOTS_SQL: &str = include_str!("kv_slots.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Slot storage over an owned SQLite connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) a database file holding the slot table.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file comes from a newer binary.
    /// - `Sqlite` when the file cannot be opened or the table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory slot table.
    pub fn open_in_memory() -> StorageResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<SqliteKeyValueStore> {
    let started_at = Instant::now();
    let result = open()
        .map_err(StorageError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            ensure_slot_table(&mut conn)?;
            Ok(conn)
        });

    match result {
        Ok(conn) => {
            info!(
                "event=slot_db_open module=storage status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(SqliteKeyValueStore { conn })
        }
        Err(err) => {
            error!(
                "event=slot_db_open module=storage status=error mode={} duration_ms={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn ensure_slot_table(conn: &mut Connection) -> StorageResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    match found {
        SLOT_SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_SLOTS_SQL)?;
            tx.execute_batch(&format!("PRAGMA user_version = {SLOT_SCHEMA_VERSION};"))?;
            tx.commit()?;
            info!(
                "event=slot_db_init module=storage status=ok schema_version={SLOT_SCHEMA_VERSION}"
            );
            Ok(())
        }
        found => Err(StorageError::UnsupportedSchemaVersion {
            found,
            supported: SLOT_SCHEMA_VERSION,
        }),
    }
}
