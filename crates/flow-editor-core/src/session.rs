//! Editing session: state plus durable storage.

use smol_str::SmolStr;

use crate::actions::EditorAction;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::Result;
use crate::persist::{self, Storage};
use crate::state::{EditorState, Outcome};

/// An [`EditorState`] bound to a storage slot.
///
/// The snapshot is read once when the session opens and written after every
/// applied action. Writes are best-effort: a failure is logged and the
/// in-memory document and history are kept as they are.
#[derive(Debug)]
pub struct Editor<S> {
    state: EditorState,
    storage: S,
    key: SmolStr,
}

impl<S: Storage> Editor<S> {
    /// Restore the stored document, or start from [`Document::default`].
    ///
    /// A snapshot that fails to decode is copied to `<key>.corrupt` before
    /// the session can overwrite it.
    pub fn open(mut storage: S, config: &EditorConfig) -> Self {
        let key = &config.storage_key;
        let document = match persist::restore(&storage, key) {
            Some(document) => document,
            None => {
                set_aside_corrupt(&mut storage, key);
                tracing::debug!(%key, "no stored document, starting empty");
                Document::default()
            }
        };
        Self {
            state: EditorState::with_config(document, config),
            storage,
            key: config.storage_key.clone(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn document(&self) -> &Document {
        self.state.document()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn execute(&mut self, action: EditorAction) -> Outcome {
        let outcome = self.state.execute(action);
        if outcome.is_applied() {
            self.save_best_effort();
        }
        outcome
    }

    /// Replace the whole document (e.g. a plain-text import) and persist it.
    pub fn replace_document(&mut self, document: Document) -> Result<()> {
        self.state.replace_document(document);
        self.save()
    }

    /// Drop the stored snapshot and start over from an empty document.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(&self.key)?;
        self.state.replace_document(Document::default());
        Ok(())
    }

    /// Write the current document now.
    pub fn save(&mut self) -> Result<()> {
        persist::persist(&mut self.storage, &self.key, self.state.document())
    }

    fn save_best_effort(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!(key = %self.key, error = %e, "failed to persist document");
        }
    }
}

fn set_aside_corrupt(storage: &mut impl Storage, key: &str) {
    let Ok(Some(raw)) = storage.get(key) else {
        return;
    };
    let backup = format!("{key}.corrupt");
    match storage.set(&backup, &raw) {
        Ok(()) => tracing::warn!(%key, %backup, "kept unreadable snapshot"),
        Err(e) => tracing::warn!(%key, error = %e, "failed to keep unreadable snapshot"),
    }
}
