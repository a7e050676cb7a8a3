//! Undo/redo management for formatting commands.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `History` - the undo/redo stack pair of recorded document transitions

use crate::document::Document;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
/// [`crate::EditorState`] implements this by swapping its document with the
/// one recorded in its [`History`].
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A recorded document transition.
///
/// Both sides are whole documents; since commands share untouched blocks,
/// holding on to them only costs the blocks that actually changed.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Document before the command (restored by undo).
    pub before: Document,
    /// Document after the command (restored by redo).
    pub after: Document,
}

/// Linear undo/redo history. Branching is not supported: recording a new
/// transition drops everything on the redo stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_steps: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `max_steps` undo entries.
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..Self::default()
        }
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    /// Record a transition and clear the redo stack.
    pub fn record(&mut self, before: Document, after: Document) {
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry { before, after });

        // Trim if over max
        if let Some(max) = self.max_steps {
            let excess = self.undo_stack.len().saturating_sub(max);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Pop the newest transition and return the document it started from.
    pub fn undo(&mut self) -> Option<Document> {
        let entry = self.undo_stack.pop()?;
        let before = entry.before.clone();
        self.redo_stack.push(entry);
        Some(before)
    }

    /// Re-apply the most recently undone transition and return its result.
    pub fn redo(&mut self) -> Option<Document> {
        let entry = self.redo_stack.pop()?;
        let after = entry.after.clone();
        self.undo_stack.push(entry);
        Some(after)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
