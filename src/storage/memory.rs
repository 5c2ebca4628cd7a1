//! In-process storage, lost when the process exits

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use super::ProfileStorage;

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a raw value, e.g. a hand-written or damaged document.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.entries().insert(key.to_string(), value.to_string());
        storage
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("Memory storage lock poisoned")
    }
}

impl ProfileStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
