//! flow-editor-core: rich-text formatting core without framework dependencies.
//!
//! This crate provides:
//! - `Document` - flat tree of blocks holding marked text runs
//! - query predicates and toggle commands scoped to a `Selection`
//! - `History` / `EditorState` - linear undo/redo over document values
//! - plain-text codec and JSON snapshot persistence behind a `Storage` trait
//! - key bindings and toolbar state for host UIs

pub mod actions;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod keymap;
pub mod persist;
pub mod plaintext;
pub mod query;
pub mod session;
pub mod state;
pub mod toolbar;
pub mod types;

pub use actions::{Command, EditorAction, Key, KeyCombo, KeydownResult, Modifiers};
pub use commands::{FormatCommand, toggle_align, toggle_block, toggle_mark};
pub use config::EditorConfig;
pub use document::{Block, Document, Node, TextRun};
pub use error::{EditorError, Result};
pub use history::{History, HistoryEntry, UndoManager};
pub use keymap::KeybindingConfig;
pub use persist::{FileStorage, MemoryStorage, STORAGE_KEY, Storage};
pub use plaintext::{deserialize_plain_text, serialize_plain_text};
pub use query::{is_align_active, is_block_active, is_mark_active, is_selection_active};
pub use session::Editor;
pub use smol_str::SmolStr;
pub use state::{EditorState, Outcome};
pub use toolbar::{Control, ControlState, ToolbarState, ToolbarVariant};
pub use types::{Alignment, BlockKind, MarkKind, Point, Selection};
