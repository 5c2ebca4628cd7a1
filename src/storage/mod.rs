//! Durable key/value storage for the profile document
//!
//! The engine persists exactly one document under a fixed key, the same way
//! the browser build keeps it in local storage. Backends only move strings;
//! parsing and self-healing happen in the profile store.

mod file;
mod memory;
mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A string key/value store.
pub trait ProfileStorage: Send + Sync {
    /// Read the value under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`. Must be durable when it returns.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key
    #[default]
    File,
    /// A single SQLite database file
    Sqlite,
    /// Process memory only
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    /// Open the backend rooted at `data_dir`.
    pub fn open(&self, data_dir: &Path) -> Result<Arc<dyn ProfileStorage>> {
        Ok(match self {
            Self::File => Arc::new(FileStorage::new(data_dir)?),
            Self::Sqlite => Arc::new(SqliteStorage::open(&data_dir.join("profile.db"))?),
            Self::Memory => Arc::new(MemoryStorage::new()),
        })
    }
}
