//! Slot storage backends
//!
//! Supports a local filesystem backend (one JSON file per slot) and an
//! in-memory backend used by tests and benchmarks.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StorageError;

// ============================================================================
// Slot Store Trait
// ============================================================================

/// Trait for durable slot backends
pub trait SlotStore: Send + Sync {
    /// Read a slot; `None` when it has never been written
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the whole slot
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Remove a slot; removing an absent slot is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Slot backend shared by the stores of one library
pub type SharedSlots = Arc<dyn SlotStore>;

// ============================================================================
// Local Filesystem Backend
// ============================================================================

/// Filesystem slots: `<dir>/<key>.json`, replaced atomically via rename
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.slot_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        let temp_path = self.temp_path(key);
        fs::write(&temp_path, bytes).map_err(|e| io_error(key, e))?;
        fs::rename(&temp_path, self.slot_path(key)).map_err(|e| io_error(key, e))?;

        tracing::trace!(slot = key, bytes = bytes.len(), "Wrote slot");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

// ============================================================================
// In-Memory Backend
// ============================================================================

/// In-memory slots
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot with raw bytes
    pub fn with_slot(self, key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.slots.lock().insert(key.to_string(), bytes.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.slots.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(temp_dir.path().join("nested"));

        assert!(store.read("notes").unwrap().is_none());

        store.write("notes", b"[1,2,3]").unwrap();
        assert_eq!(store.read("notes").unwrap().unwrap(), b"[1,2,3]");

        // Overwrite replaces the whole slot
        store.write("notes", b"[]").unwrap();
        assert_eq!(store.read("notes").unwrap().unwrap(), b"[]");

        // No temp file left behind
        assert!(!temp_dir.path().join("nested").join(".notes.json.tmp").exists());
    }

    #[test]
    fn test_file_slot_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSlotStore::new(temp_dir.path());

        store.write("bookmarks", b"{}").unwrap();
        store.remove("bookmarks").unwrap();
        store.remove("bookmarks").unwrap();
        assert!(store.read("bookmarks").unwrap().is_none());
    }

    #[test]
    fn test_file_slot_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let store = FileSlotStore::new(&blocker);
        let result = store.write("notes", b"[]");
        assert!(matches!(result, Err(StorageError::Io { ref key, .. }) if key == "notes"));
    }

    #[test]
    fn test_memory_slots() {
        let store = MemorySlotStore::new().with_slot("a", "x");
        assert!(store.contains("a"));
        assert_eq!(store.read("a").unwrap().unwrap(), b"x");

        store.remove("a").unwrap();
        assert!(store.read("a").unwrap().is_none());
    }
}
