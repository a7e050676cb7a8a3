//! Error types for editor operations.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

use crate::types::Point;

/// Errors that can occur while editing, persisting or decoding a document.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    /// A selection point does not resolve against the document.
    #[error("invalid selection at {point}: {reason}")]
    #[diagnostic(
        code(flow_editor::invalid_selection),
        help("selection points are `block:offset`, offsets count characters within the block")
    )]
    InvalidSelection { point: Point, reason: SmolStr },

    /// The stored snapshot could not be decoded into a valid document.
    #[error("corrupt persisted state: {0}")]
    #[diagnostic(code(flow_editor::corrupt_state))]
    CorruptPersistedState(String),

    /// A document that breaks the block/text-run invariants.
    #[error("invalid document: {0}")]
    #[diagnostic(code(flow_editor::invalid_document))]
    InvalidDocument(SmolStr),

    /// A mark, block kind or alignment name that is not recognised.
    #[error("unknown {category} name `{name}`")]
    #[diagnostic(code(flow_editor::unknown_name))]
    UnknownName {
        category: &'static str,
        name: SmolStr,
    },

    /// Malformed textual input (selections, actions).
    #[error("parse error: {0}")]
    #[diagnostic(code(flow_editor::parse))]
    Parse(SmolStr),

    /// A storage key that cannot name a slot.
    #[error("invalid storage key `{0}`")]
    #[diagnostic(
        code(flow_editor::invalid_key),
        help("storage keys must be non-empty and must not contain path separators or `..`")
    )]
    InvalidStorageKey(SmolStr),

    /// A storage backend failed.
    #[error(transparent)]
    #[diagnostic(code(flow_editor::storage))]
    Storage(#[from] std::io::Error),

    /// Snapshot encoding failed.
    #[error(transparent)]
    #[diagnostic(code(flow_editor::serde))]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub(crate) fn invalid_selection(point: Point, reason: impl Into<SmolStr>) -> Self {
        Self::InvalidSelection {
            point,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_name(category: &'static str, name: &str) -> Self {
        Self::UnknownName {
            category,
            name: name.into(),
        }
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
