//! Editor state and action execution.
//!
//! `EditorState` owns the document, the host's last reported selection and
//! the history. It is the only place where a command result becomes the
//! current document, and it records the transition in the same step, so the
//! history never sees a document it did not record.

use crate::actions::{EditorAction, KeyCombo, KeydownResult};
use crate::commands::{self, FormatCommand};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::EditorError;
use crate::history::{History, UndoManager};
use crate::keymap::KeybindingConfig;
use crate::toolbar::{ToolbarState, ToolbarVariant};
use crate::types::Selection;

/// What happened to an action.
#[derive(Debug)]
pub enum Outcome {
    /// The document changed.
    Applied,
    /// Nothing to do: collapsed mark toggle, no-op toggle, empty history.
    Unchanged,
    /// The action was refused; document and history are untouched.
    Rejected(EditorError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    document: Document,
    selection: Option<Selection>,
    history: History,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
            history: History::new(),
        }
    }

    /// State whose history depth follows `config`.
    pub fn with_config(document: Document, config: &EditorConfig) -> Self {
        let history = match config.history_depth {
            Some(depth) => History::with_max_steps(depth),
            None => History::new(),
        };
        Self {
            document,
            selection: None,
            history,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Record the host's current selection (used for toolbar state).
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Replace the document wholesale (import, reset) and drop the history.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.selection = None;
        self.history.clear();
    }

    /// Execute an editor action.
    ///
    /// This is the central dispatch point for all editor operations.
    pub fn execute(&mut self, action: EditorAction) -> Outcome {
        match action {
            EditorAction::ToggleMark { mark, selection } => {
                self.execute_format(FormatCommand::ToggleMark(mark), selection)
            }
            EditorAction::ToggleBlock { kind, selection } => {
                self.execute_format(FormatCommand::ToggleBlock(kind), selection)
            }
            EditorAction::ToggleAlign {
                alignment,
                selection,
            } => self.execute_format(FormatCommand::ToggleAlign(alignment), selection),
            EditorAction::Undo => {
                if self.undo() {
                    Outcome::Applied
                } else {
                    Outcome::Unchanged
                }
            }
            EditorAction::Redo => {
                if self.redo() {
                    Outcome::Applied
                } else {
                    Outcome::Unchanged
                }
            }
        }
    }

    fn execute_format(&mut self, command: FormatCommand, selection: Selection) -> Outcome {
        self.selection = Some(selection);
        match commands::apply(&self.document, &selection, command) {
            Ok(next) if next == self.document => Outcome::Unchanged,
            Ok(next) => {
                let before = std::mem::replace(&mut self.document, next);
                self.history.record(before, self.document.clone());
                tracing::debug!(?command, %selection, "applied command");
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(?command, %selection, error = %e, "rejected command");
                Outcome::Rejected(e)
            }
        }
    }

    /// Handle a key combination using `bindings`, with the selection the
    /// host reports for this event.
    pub fn handle_keydown(
        &mut self,
        bindings: &KeybindingConfig,
        combo: &KeyCombo,
        selection: Selection,
    ) -> KeydownResult {
        if let Some(command) = bindings.lookup(combo) {
            self.execute(command.with_selection(selection));
            return KeydownResult::Handled;
        }

        // No keybinding matched - check if this is navigation or content
        if combo.key.is_navigation() || combo.key.is_modifier() {
            return KeydownResult::PassThrough;
        }

        KeydownResult::NotHandled
    }

    /// Toolbar state for the current selection.
    pub fn toolbar(&self, variant: ToolbarVariant) -> ToolbarState {
        ToolbarState::compute(
            variant,
            &self.document,
            self.selection.as_ref(),
            &self.history,
        )
    }
}

impl UndoManager for EditorState {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn undo(&mut self) -> bool {
        let Some(document) = self.history.undo() else {
            return false;
        };
        self.document = document;
        // Offsets in the old selection may no longer fit.
        self.selection = None;
        true
    }

    fn redo(&mut self) -> bool {
        let Some(document) = self.history.redo() else {
            return false;
        };
        self.document = document;
        self.selection = None;
        true
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}
