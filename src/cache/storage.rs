//! Durable key-value storage for persisted search state
//!
//! Provides a synchronous, string-keyed `Storage` abstraction with a
//! file-backed implementation (one JSON file per key in an XDG cache
//! directory) and an in-memory implementation for tests and for hosts
//! without a home directory.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading or writing durable storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read or write failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A previous writer panicked while holding the in-memory map
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A synchronous string-keyed store that survives process restarts
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if nothing was stored
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as a JSON file on disk
///
/// Files live in an XDG-compliant cache directory (`~/.cache/countries/` on
/// Linux) unless a directory is given explicitly.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory where storage files are kept
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a FileStorage using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "countries")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStorage rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the directory storage files are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the file backing `key`
    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.item_path(key);
        fs::write(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "storage item written");
        Ok(())
    }
}

/// Keeps items in process memory only
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a MemoryStorage pre-populated with one item
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut items) = storage.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = FileStorage::with_dir(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_set_item_creates_file_in_storage_directory() {
        let (storage, temp_dir) = create_test_storage();

        storage
            .set_item("test_key", r#"{"value":42}"#)
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("test_key.json");
        assert!(expected_path.exists(), "Storage file should exist");
        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert_eq!(content, r#"{"value":42}"#);
    }

    #[test]
    fn test_get_item_returns_none_for_missing_key() {
        let (storage, _temp_dir) = create_test_storage();

        let result = storage.get_item("nonexistent_key").expect("Read should succeed");

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_get_item_returns_written_value() {
        let (storage, _temp_dir) = create_test_storage();

        storage.set_item("key", "hello").expect("Write should succeed");

        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_get_item_reports_unreadable_entry() {
        let (storage, temp_dir) = create_test_storage();
        // A directory where the file should be cannot be read as a string
        fs::create_dir_all(temp_dir.path().join("broken.json")).unwrap();

        let result = storage.get_item("broken");

        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn test_set_item_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let storage = FileStorage::with_dir(nested_path.clone());

        storage.set_item("nested_key", "{}").expect("Write should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(nested_path.join("nested_key.json").exists(), "Storage file should exist");
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(storage) = FileStorage::new() {
            let path_str = storage.dir().to_string_lossy();
            assert!(
                path_str.contains("countries"),
                "Storage path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_overwrite_existing_item() {
        let (storage, _temp_dir) = create_test_storage();

        storage.set_item("overwrite_key", "first").expect("First write should succeed");
        storage.set_item("overwrite_key", "second").expect("Second write should succeed");

        assert_eq!(
            storage.get_item("overwrite_key").unwrap().as_deref(),
            Some("second"),
            "Storage should contain latest value"
        );
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("k").unwrap().is_none());

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_memory_storage_with_item() {
        let storage = MemoryStorage::with_item("seeded", "value");
        assert_eq!(storage.get_item("seeded").unwrap().as_deref(), Some("value"));
    }
}
