//! Snapshot persistence for the editor.
//!
//! The whole document is stored as JSON under one key. The JSON uses the
//! classic rich-text node shape, so snapshots written by earlier browser
//! builds of the editor load unchanged:
//!
//! ```json
//! [{"type": "heading1", "align": "center", "children": [{"text": "Hi", "bold": true}]}]
//! ```
//!
//! Undo/redo history is session-only and never persisted.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{EditorError, Result};

/// Default storage key for the document snapshot.
pub const STORAGE_KEY: &str = "value";

/// Check that `key` can name a slot: non-empty, no path separators, no `..`.
pub fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.contains(['/', '\\', '\0'])
        || key.contains("..");
    if bad {
        return Err(EditorError::InvalidStorageKey(key.into()));
    }
    Ok(())
}

/// Durable string key-value slots.
pub trait Storage {
    /// Read a slot. `Ok(None)` when nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process storage, for tests and hosts that bring their own durability.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Storage backed by a directory, one `<key>.json` file per slot.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the slot, so a slot holds either the old or the new snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a new [`FileStorage`] rooted at `dir`. The directory is created
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Encode a document as its JSON snapshot.
pub fn to_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

/// Decode a JSON snapshot, checking the tree invariants.
pub fn from_json(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(|e| EditorError::CorruptPersistedState(e.to_string()))
}

/// Write the snapshot of `doc` to `key`.
pub fn persist(storage: &mut impl Storage, key: &str, doc: &Document) -> Result<()> {
    let json = to_json(doc)?;
    storage.set(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "persisted document snapshot");
    Ok(())
}

/// Read the snapshot stored under `key`.
///
/// Returns None when the slot is empty, unreadable or does not hold a valid
/// document; callers fall back to [`Document::default`].
pub fn restore(storage: &impl Storage, key: &str) -> Option<Document> {
    let json = match storage.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read document snapshot");
            return None;
        }
    };
    match from_json(&json) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt document snapshot");
            None
        }
    }
}
