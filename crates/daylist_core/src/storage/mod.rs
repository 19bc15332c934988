//! Key-value slot storage used as the persistence medium.
//!
//! # Responsibility
//! - Define the whole-value string slot contract the task store writes through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `set` replaces the full slot value; there are no partial writes.
//! - Reading or removing an absent key is not an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteKeyValueStore, SLOT_SCHEMA_VERSION};

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport failure while opening, reading, or writing a slot.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// Slot database was written by a newer binary.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "slot storage failed: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "slot database schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous string slot storage keyed by a namespaced name.
pub trait KeyValueStore {
    /// Returns the slot value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the whole slot value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes the slot. Absent keys are ignored.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
