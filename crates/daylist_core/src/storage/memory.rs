//! Process-local slot storage.

use super::{KeyValueStore, StorageResult};
use std::collections::HashMap;

/// `HashMap`-backed slots. Contents do not outlive the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one pre-populated slot.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self { slots }
    }

    /// Raw slot value, bypassing the trait for inspection.
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}
