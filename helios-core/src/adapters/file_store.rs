//! JSON file session store
//!
//! Persists the session as a single JSON object:
//! ```json
//! { "token": "...", "refreshToken": "...", "user": "{...}" }
//! ```
//! Every write replaces the whole file through a temp file in the same
//! directory, so readers never see a half-written session.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::StorageKey;
use crate::ports::SessionStore;

/// File name used inside the helios directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Store at `<dir>/session.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::storage(format!(
                "corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(values)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::storage(format!("failed to persist session file: {}", e)))?;
        debug!(path = %self.path.display(), keys = values.len(), "session file written");
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| Error::storage("session file lock poisoned"))?;
        let mut values = self.read_all()?;
        if change(&mut values) {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| Error::storage("session file lock poisoned"))?;
        Ok(self.read_all()?.remove(key.as_str()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.update(|values| {
            values.insert(key.as_str().to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.update(|values| values.remove(key.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_a_new_instance() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set(StorageKey::AccessToken, "access").unwrap();
        store.set(StorageKey::RefreshToken, "refresh").unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(
            reopened.get(StorageKey::AccessToken).unwrap().as_deref(),
            Some("access")
        );
        assert_eq!(
            reopened.get(StorageKey::RefreshToken).unwrap().as_deref(),
            Some("refresh")
        );
        assert!(reopened.get(StorageKey::User).unwrap().is_none());
    }

    #[test]
    fn test_file_uses_persisted_key_names() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set(StorageKey::RefreshToken, "r").unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["refreshToken"], "r");
    }

    #[test]
    fn test_remove_missing_key_does_not_create_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.remove(StorageKey::User).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        let err = store.get(StorageKey::AccessToken).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
