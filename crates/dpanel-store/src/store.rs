//! # Key-Value Stores
//!
//! The editor keeps exactly one snapshot per key. [`KeyValueStore`] is the
//! seam; two backends implement it:
//!
//! - [`MemoryStore`]: a `parking_lot::RwLock` over a map. Cloning shares
//!   the same data.
//! - [`FileStore`]: one `<key>.json` file per key inside a directory.
//!
//! Keys are restricted to `[A-Za-z0-9_-]` so a key always maps to a single
//! file name inside the store directory.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;

/// Byte-oriented key-value persistence.
///
/// Implementations must be `Send + Sync` so one store can back several
/// editing sessions.
pub trait KeyValueStore: Send + Sync {
    /// The bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Returns true if something was removed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// Check a store key against `[A-Za-z0-9_-]+`.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// -- MemoryStore --------------------------------------------------------------

/// Thread-safe, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.data.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.data.write().remove(key).is_some())
    }
}

// -- FileStore ----------------------------------------------------------------

/// Directory-backed store: the value of `key` lives in `<dir>/<key>.json`.
///
/// The directory is created on the first `set`. Writes go to a temporary
/// sibling file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value of `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("state").unwrap(), None);
        store.set("state", b"one").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some(&b"one"[..]));
        store.set("state", b"two").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some(&b"two"[..]));
        assert!(store.remove("state").unwrap());
        assert!(!store.remove("state").unwrap());
        assert_eq!(store.get("state").unwrap(), None);
    }

    #[test]
    fn memory_store_get_set_remove() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileStore::new(dir.path().join("state")));
    }

    #[test]
    fn memory_store_clones_share_data() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", b"v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some(&b"v"[..]));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("deluxepanels_editor_state", b"{}").unwrap();
        let path = dir.path().join("deluxepanels_editor_state.json");
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["deluxepanels_editor_state.json"]);
    }

    #[test]
    fn keys_are_restricted() {
        let store = MemoryStore::new();
        for key in ["", "../escape", "a/b", "has space", "dot.json"] {
            assert!(
                matches!(store.set(key, b"x"), Err(StoreError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
        assert!(validate_key("editor-state_2").is_ok());
    }

    #[test]
    fn stores_are_shareable_across_threads() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.set(&format!("k{i}"), b"v").unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        for i in 0..4 {
            assert!(store.get(&format!("k{i}")).unwrap().is_some());
        }
    }
}
