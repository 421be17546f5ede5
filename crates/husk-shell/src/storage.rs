//! Key-value persistence behind the session.
//!
//! The session saves its filesystem snapshot and history under string
//! keys and restores them at construction. [`MemoryStore`] keeps a
//! session ephemeral; [`JsonFileStore`] persists across runs.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use husk_types::error::Result;

/// String key-value store the session persists through.
pub trait KeyValueStore {
    /// Fetch a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Set a value, replacing any existing one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Remove a value if present.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Ephemeral in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object of strings on disk.
///
/// The whole object is read once at open and rewritten on every
/// mutation. A missing file is an empty store; the file is created on
/// the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let values = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("opened state store at {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use husk_types::error::HuskError;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("value"));
        store.set("key", "other").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("other"));
        store.remove("key").unwrap();
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        store.remove("never-set").unwrap();
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(&dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("filesystem", "<d name='/' path='/'>").unwrap();
        store.set("history", "ls\npwd").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("filesystem").as_deref(),
            Some("<d name='/' path='/'>")
        );
        assert_eq!(reopened.get("history").as_deref(), Some("ls\npwd"));
    }

    #[test]
    fn file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("key", "value").unwrap();
        store.remove("key").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("key"), None);
    }

    #[test]
    fn file_store_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json at all").unwrap();
        match JsonFileStore::open(&path) {
            Err(HuskError::Json(_)) => {},
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[test]
    fn file_store_values_survive_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("content", "héllo \"quoted\" 日本").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("content").as_deref(),
            Some("héllo \"quoted\" 日本")
        );
    }
}
