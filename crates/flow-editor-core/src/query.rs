//! Read-only predicates over a document and a selection.
//!
//! These drive the "pressed" state of toolbar controls and the toggle
//! decisions in [`crate::commands`]. None of them mutate anything, and a
//! selection that does not fit the document answers `false`.

use std::ops::Range;

use crate::document::{Document, Node, ResolvedSelection};
use crate::types::{Alignment, BlockKind, MarkKind, Selection};

/// A node touched by a selection.
#[derive(Clone, Debug)]
pub struct NodeEntry<'a> {
    pub node: Node<'a>,
    /// Index of the block the node is, or belongs to.
    pub block: usize,
    /// Chars of the node covered by the selection, relative to the block.
    pub span: Range<usize>,
}

/// Nodes overlapped by `selection`, in document order.
///
/// Every block between the two ends is yielded. Text runs are yielded only
/// when they share at least one character with the selection.
pub fn nodes_in<'a>(
    doc: &'a Document,
    selection: &ResolvedSelection,
) -> impl Iterator<Item = NodeEntry<'a>> + 'a {
    let selection = *selection;
    selection.blocks().flat_map(move |index| {
        let block = doc.block(index);
        block.into_iter().flat_map(move |block| {
            let selected = selection.span_in_block(index, block.len_chars());
            let block_entry = NodeEntry {
                node: Node::Block(block),
                block: index,
                span: selected.clone(),
            };
            let runs = block.runs_with_ranges().filter_map(move |(range, run)| {
                let span = range.start.max(selected.start)..range.end.min(selected.end);
                (span.start < span.end).then_some(NodeEntry {
                    node: Node::Text(run),
                    block: index,
                    span,
                })
            });
            std::iter::once(block_entry).chain(runs)
        })
    })
}

/// Whether every text run under a non-collapsed selection carries `mark`.
pub fn is_mark_active(doc: &Document, selection: &Selection, mark: MarkKind) -> bool {
    if selection.is_collapsed() {
        return false;
    }
    let Ok(resolved) = doc.resolve(*selection) else {
        return false;
    };
    let mut runs = nodes_in(doc, &resolved)
        .filter_map(|entry| match entry.node {
            Node::Text(run) => Some(run),
            Node::Block(_) => None,
        })
        .peekable();
    runs.peek().is_some() && runs.all(|run| run.has_mark(mark))
}

/// Whether the block holding the start of the selection is of `kind`.
pub fn is_block_active(doc: &Document, selection: &Selection, kind: BlockKind) -> bool {
    start_block(doc, selection).is_some_and(|index| {
        doc.block(index)
            .is_some_and(|block| block.kind() == kind)
    })
}

/// Whether the block holding the start of the selection has `alignment`.
pub fn is_align_active(doc: &Document, selection: &Selection, alignment: Alignment) -> bool {
    start_block(doc, selection).is_some_and(|index| {
        doc.block(index)
            .is_some_and(|block| block.align() == alignment)
    })
}

/// Whether the selection covers a range rather than a caret.
pub fn is_selection_active(selection: &Selection) -> bool {
    !selection.is_collapsed()
}

fn start_block(doc: &Document, selection: &Selection) -> Option<usize> {
    doc.resolve(*selection).ok().map(|resolved| resolved.start.block)
}
