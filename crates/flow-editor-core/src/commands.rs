//! Formatting commands.
//!
//! Each command takes the current document by reference and returns the next
//! document value. Blocks the command does not touch are shared with the
//! input document. The selection is validated before anything is built, so a
//! rejected command never leaves a half-applied tree behind.

use std::sync::Arc;

use crate::document::{Block, Document};
use crate::error::Result;
use crate::query;
use crate::types::{Alignment, BlockKind, MarkKind, Selection};

/// A formatting request, decoded from a toolbar click or key combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    ToggleMark(MarkKind),
    ToggleBlock(BlockKind),
    ToggleAlign(Alignment),
}

/// Dispatch a [`FormatCommand`] to its toggle.
pub fn apply(doc: &Document, selection: &Selection, command: FormatCommand) -> Result<Document> {
    match command {
        FormatCommand::ToggleMark(mark) => toggle_mark(doc, selection, mark),
        FormatCommand::ToggleBlock(kind) => toggle_block(doc, selection, kind),
        FormatCommand::ToggleAlign(alignment) => toggle_align(doc, selection, alignment),
    }
}

/// Add `mark` to every run under the selection, or remove it when every run
/// already has it.
///
/// Runs that straddle a selection boundary are split at the boundary first.
/// Adjacent runs that end up with the same marks are left unmerged.
pub fn toggle_mark(doc: &Document, selection: &Selection, mark: MarkKind) -> Result<Document> {
    let resolved = doc.resolve(*selection)?;
    if resolved.is_collapsed() {
        return Ok(doc.clone());
    }

    let active = query::is_mark_active(doc, selection, mark);
    let blocks = doc
        .arcs()
        .iter()
        .enumerate()
        .map(|(index, block)| {
            if !resolved.blocks().contains(&index) {
                return Arc::clone(block);
            }
            let selected = resolved.span_in_block(index, block.len_chars());
            let mut changed = false;
            let mut children = Vec::with_capacity(block.children().len() + 2);
            for (range, run) in block.runs_with_ranges() {
                let lo = range.start.max(selected.start);
                let hi = range.end.min(selected.end);
                if lo >= hi {
                    children.push(run.clone());
                    continue;
                }
                // Split at the selection edges even when the marks end up equal.
                let local = |offset: usize| offset - range.start;
                if lo > range.start {
                    children.push(run.slice(0..local(lo)));
                }
                let mut inner = run.slice(local(lo)..local(hi));
                if active {
                    inner.marks.remove(&mark);
                } else {
                    inner.marks.insert(mark);
                }
                changed |= lo > range.start || hi < range.end || inner.marks != run.marks;
                children.push(inner);
                if hi < range.end {
                    children.push(run.slice(local(hi)..local(range.end)));
                }
            }
            if changed {
                Arc::new(block.with_children(children))
            } else {
                Arc::clone(block)
            }
        })
        .collect();

    Document::from_arcs(blocks)
}

/// Set every overlapped block to `kind`, or back to the default kind when the
/// first overlapped block already is `kind`.
pub fn toggle_block(doc: &Document, selection: &Selection, kind: BlockKind) -> Result<Document> {
    let resolved = doc.resolve(*selection)?;
    let active = query::is_block_active(doc, selection, kind);
    let target = if active { BlockKind::Default } else { kind };
    tracing::trace!(%kind, active, "toggle block");

    map_blocks(doc, resolved.blocks(), |block| {
        (block.kind() != target).then(|| block.with_kind(target))
    })
}

/// Set every overlapped block to `alignment`, or back to inherited alignment
/// when the first overlapped block already has it.
pub fn toggle_align(
    doc: &Document,
    selection: &Selection,
    alignment: Alignment,
) -> Result<Document> {
    let resolved = doc.resolve(*selection)?;
    let active = query::is_align_active(doc, selection, alignment);
    let target = if active { Alignment::None } else { alignment };
    tracing::trace!(%alignment, active, "toggle align");

    map_blocks(doc, resolved.blocks(), |block| {
        (block.align() != target).then(|| block.clone().with_align(target))
    })
}

/// Rebuild the blocks in `range` with `f`; `None` keeps the shared block.
fn map_blocks(
    doc: &Document,
    range: std::ops::RangeInclusive<usize>,
    f: impl Fn(&Block) -> Option<Block>,
) -> Result<Document> {
    let blocks = doc
        .arcs()
        .iter()
        .enumerate()
        .map(|(index, block)| match range.contains(&index).then(|| f(block)).flatten() {
            Some(updated) => Arc::new(updated),
            None => Arc::clone(block),
        })
        .collect();
    Document::from_arcs(blocks)
}

/// Text runs of a block, as `(text, marks)` pairs. Test helper.
#[cfg(test)]
pub(crate) fn runs_of(doc: &Document, index: usize) -> Vec<(String, Vec<MarkKind>)> {
    doc.block(index)
        .map(|block| {
            block
                .children()
                .iter()
                .map(|run| (run.text.to_string(), run.marks.iter().copied().collect()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextRun;
    use crate::error::EditorError;
    use crate::types::Point;

    fn hello_world() -> Document {
        Document::new(vec![Block::paragraph("Hello world")]).unwrap()
    }

    #[test]
    fn test_bold_hello_splits_run() {
        let doc = hello_world();
        let sel = Selection::within(0, 0, 5);

        let bolded = toggle_mark(&doc, &sel, MarkKind::Bold).unwrap();
        assert_eq!(
            runs_of(&bolded, 0),
            vec![
                ("Hello".to_string(), vec![MarkKind::Bold]),
                (" world".to_string(), vec![]),
            ]
        );

        // Second toggle removes the mark but keeps the split point.
        let restored = toggle_mark(&bolded, &sel, MarkKind::Bold).unwrap();
        assert_eq!(
            runs_of(&restored, 0),
            vec![("Hello".to_string(), vec![]), (" world".to_string(), vec![])]
        );
        assert_eq!(restored.block(0).unwrap().string(), "Hello world");
    }

    #[test]
    fn test_collapsed_selection_is_noop() {
        let doc = hello_world();
        let caret = Selection::collapsed(Point::new(0, 3));
        let result = toggle_mark(&doc, &caret, MarkKind::Italic).unwrap();
        assert_eq!(result, doc);
        assert!(result.shares_block_with(&doc, 0));
    }

    #[test]
    fn test_middle_selection_splits_into_three() {
        let doc = hello_world();
        let result = toggle_mark(&doc, &Selection::within(0, 2, 7), MarkKind::Italic).unwrap();
        assert_eq!(
            runs_of(&result, 0),
            vec![
                ("He".to_string(), vec![]),
                ("llo w".to_string(), vec![MarkKind::Italic]),
                ("orld".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_partial_mark_is_completed_not_removed() {
        let doc = Document::new(vec![
            Block::new(
                BlockKind::Paragraph,
                vec![
                    TextRun::new("ab").with_mark(MarkKind::Bold),
                    TextRun::new("cd"),
                ],
            )
            .unwrap(),
        ])
        .unwrap();
        let result = toggle_mark(&doc, &Selection::within(0, 0, 4), MarkKind::Bold).unwrap();
        assert_eq!(
            runs_of(&result, 0),
            vec![
                ("ab".to_string(), vec![MarkKind::Bold]),
                ("cd".to_string(), vec![MarkKind::Bold]),
            ]
        );
    }

    #[test]
    fn test_already_marked_run_is_still_split() {
        let doc = Document::new(vec![
            Block::new(
                BlockKind::Paragraph,
                vec![
                    TextRun::new("abcd").with_mark(MarkKind::Bold),
                    TextRun::new("ef"),
                ],
            )
            .unwrap(),
        ])
        .unwrap();
        let result = toggle_mark(&doc, &Selection::within(0, 2, 5), MarkKind::Bold).unwrap();
        assert_eq!(
            runs_of(&result, 0),
            vec![
                ("ab".to_string(), vec![MarkKind::Bold]),
                ("cd".to_string(), vec![MarkKind::Bold]),
                ("e".to_string(), vec![MarkKind::Bold]),
                ("f".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_mark_across_blocks_keeps_untouched_blocks_shared() {
        let doc = Document::new(vec![
            Block::paragraph("one"),
            Block::paragraph("two"),
            Block::paragraph("three"),
            Block::paragraph("four"),
        ])
        .unwrap();
        let sel = Selection::new(Point::new(0, 1), Point::new(2, 2));
        let result = toggle_mark(&doc, &sel, MarkKind::Underline).unwrap();

        assert_eq!(
            runs_of(&result, 0),
            vec![
                ("o".to_string(), vec![]),
                ("ne".to_string(), vec![MarkKind::Underline]),
            ]
        );
        assert_eq!(
            runs_of(&result, 1),
            vec![("two".to_string(), vec![MarkKind::Underline])]
        );
        assert_eq!(
            runs_of(&result, 2),
            vec![
                ("th".to_string(), vec![MarkKind::Underline]),
                ("ree".to_string(), vec![]),
            ]
        );
        assert!(result.shares_block_with(&doc, 3));
        assert!(!result.shares_block_with(&doc, 1));
    }

    #[test]
    fn test_toggle_symmetry_restores_content() {
        let doc = Document::new(vec![
            Block::paragraph("alpha beta"),
            Block::new(
                BlockKind::Heading2,
                vec![
                    TextRun::new("gam").with_mark(MarkKind::Italic),
                    TextRun::new("ma"),
                ],
            )
            .unwrap(),
        ])
        .unwrap();
        let sel = Selection::new(Point::new(0, 6), Point::new(1, 4));
        for mark in MarkKind::ALL {
            let before = query::is_mark_active(&doc, &sel, mark);
            let once = toggle_mark(&doc, &sel, mark).unwrap();
            let twice = toggle_mark(&once, &sel, mark).unwrap();
            assert_eq!(query::is_mark_active(&twice, &sel, mark), before);
            for (a, b) in doc.blocks().zip(twice.blocks()) {
                assert_eq!(a.string(), b.string());
            }
            if mark != MarkKind::Italic {
                // Uniformly unmarked selection: every run's marks come back.
                for index in 0..doc.len() {
                    let marks_per_char = |d: &Document| -> Vec<Vec<MarkKind>> {
                        runs_of(d, index)
                            .into_iter()
                            .flat_map(|(text, marks)| {
                                text.chars().map(move |_| marks.clone()).collect::<Vec<_>>()
                            })
                            .collect()
                    };
                    assert_eq!(marks_per_char(&doc), marks_per_char(&twice));
                }
            }
        }
    }

    #[test]
    fn test_invalid_selection_rejected_without_change() {
        let doc = hello_world();
        let err = toggle_mark(&doc, &Selection::within(0, 3, 40), MarkKind::Bold).unwrap_err();
        assert!(matches!(err, EditorError::InvalidSelection { .. }));
        let err = toggle_block(&doc, &Selection::collapsed(Point::new(3, 0)), BlockKind::Heading1)
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidSelection { .. }));
        let err = toggle_align(&doc, &Selection::collapsed(Point::new(1, 0)), Alignment::Left)
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidSelection { .. }));
    }

    #[test]
    fn test_toggle_heading_and_back() {
        let doc = hello_world();
        let caret = Selection::collapsed(Point::new(0, 0));
        let heading = toggle_block(&doc, &caret, BlockKind::Heading1).unwrap();
        assert_eq!(heading.block(0).unwrap().kind(), BlockKind::Heading1);
        let back = toggle_block(&heading, &caret, BlockKind::Heading1).unwrap();
        assert_eq!(back.block(0).unwrap().kind(), BlockKind::Default);
    }

    #[test]
    fn test_toggle_block_decides_from_first_block() {
        let doc = Document::new(vec![
            Block::text(BlockKind::Heading2, "a"),
            Block::paragraph("b"),
            Block::text(BlockKind::Heading2, "c"),
            Block::paragraph("d"),
        ])
        .unwrap();
        let sel = Selection::new(Point::new(0, 0), Point::new(2, 1));

        // First block is already heading2: everything in range is cleared.
        let cleared = toggle_block(&doc, &sel, BlockKind::Heading2).unwrap();
        let kinds: Vec<_> = cleared.blocks().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Default,
                BlockKind::Default,
                BlockKind::Default,
                BlockKind::Paragraph
            ]
        );

        // Starting from a paragraph: everything in range becomes heading2.
        let sel = Selection::new(Point::new(1, 0), Point::new(2, 0));
        let applied = toggle_block(&doc, &sel, BlockKind::Heading2).unwrap();
        let kinds: Vec<_> = applied.blocks().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading2,
                BlockKind::Heading2,
                BlockKind::Heading2,
                BlockKind::Paragraph
            ]
        );
        // Block 2 already had the target kind and is shared.
        assert!(applied.shares_block_with(&doc, 2));
    }

    #[test]
    fn test_toggle_align_uniform() {
        let doc = Document::new(vec![
            Block::paragraph("a").with_align(Alignment::Center),
            Block::paragraph("b"),
        ])
        .unwrap();
        let sel = Selection::new(Point::new(0, 0), Point::new(1, 1));

        let cleared = toggle_align(&doc, &sel, Alignment::Center).unwrap();
        assert!(cleared.blocks().all(|b| b.align() == Alignment::None));

        let justified = toggle_align(&doc, &sel, Alignment::Justify).unwrap();
        assert!(justified.blocks().all(|b| b.align() == Alignment::Justify));
        // Alignment changes never touch runs or kinds.
        assert_eq!(justified.block(0).unwrap().kind(), BlockKind::Paragraph);
        assert_eq!(justified.block(1).unwrap().string(), "b");
    }

    #[test]
    fn test_apply_dispatches() {
        let doc = hello_world();
        let sel = Selection::within(0, 0, 5);
        let via_apply = apply(&doc, &sel, FormatCommand::ToggleMark(MarkKind::Bold)).unwrap();
        assert_eq!(via_apply, toggle_mark(&doc, &sel, MarkKind::Bold).unwrap());
        let via_apply = apply(&doc, &sel, FormatCommand::ToggleAlign(Alignment::Right)).unwrap();
        assert_eq!(via_apply.block(0).unwrap().align(), Alignment::Right);
    }
}
