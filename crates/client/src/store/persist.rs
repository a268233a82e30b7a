//! Persistence port for the stores.
//!
//! Stores never touch the filesystem directly; they write through a
//! [`StoragePort`] injected at construction. Every write replaces the whole
//! value for a key - there is no read-modify-write at the byte level.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key/value persistence with whole-value overwrite semantics.
pub trait StoragePort: Send + Sync {
    /// Load the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str);
    /// Remove the value stored under `key`.
    fn remove(&self, key: &str);
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently present (test helper).
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl StoragePort for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

/// File-backed storage: one file per key under a state directory.
///
/// Write failures are logged and swallowed - losing a persisted snapshot
/// degrades to a refetch on next start, it never takes the client down.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are dotted identifiers ("auth.access"); keep them readable but
        // refuse path separators
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StoragePort for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::write(&path, value) {
            tracing::warn!(key, path = %path.display(), error = %e, "failed to persist value");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(key, path = %path.display(), error = %e, "failed to remove value");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load("auth.access").is_none());

        storage.save("auth.access", "token");
        assert_eq!(storage.load("auth.access").as_deref(), Some("token"));

        storage.save("auth.access", "token2");
        assert_eq!(storage.load("auth.access").as_deref(), Some("token2"));

        storage.remove("auth.access");
        assert!(storage.load("auth.access").is_none());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("superlian-test-{}", std::process::id()));
        let storage = FileStorage::open(&dir).unwrap();

        storage.save("products", "{\"products\":[]}");
        assert_eq!(storage.load("products").as_deref(), Some("{\"products\":[]}"));

        storage.remove("products");
        assert!(storage.load("products").is_none());
        // Removing a missing key is fine
        storage.remove("products");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_storage_sanitizes_separators() {
        let dir = std::env::temp_dir().join(format!("superlian-sep-{}", std::process::id()));
        let storage = FileStorage::open(&dir).unwrap();
        storage.save("../escape", "x");
        assert_eq!(storage.load("../escape").as_deref(), Some("x"));
        assert!(dir.join(".._escape.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
