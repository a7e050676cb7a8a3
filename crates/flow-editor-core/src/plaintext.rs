//! Plain-text export and import.
//!
//! Lossy on the way out: marks, block kinds and alignment are dropped. Only
//! meant for copy/export paths, not for storing documents.

use crate::document::{Block, Document};

/// Each block's text, joined by a single `\n`.
pub fn serialize_plain_text(doc: &Document) -> String {
    doc.blocks()
        .map(Block::string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One paragraph per line, line text kept verbatim (including any `\r`).
pub fn deserialize_plain_text(text: &str) -> Document {
    let blocks = text.split('\n').map(Block::paragraph).collect();
    // `split` always yields at least one item, so this never falls back.
    Document::new(blocks).unwrap_or_default()
}
