//! Document tree: blocks holding text runs.
//!
//! The document is flat. The root holds an ordered, non-empty sequence of
//! [`Block`]s and every block holds an ordered, non-empty sequence of
//! [`TextRun`]s. Blocks are stored behind `Arc` so that a command can build a
//! new document that shares every block it did not touch with the previous
//! one, which is what lets history keep old documents around cheaply.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{EditorError, Result};
use crate::types::{Alignment, BlockKind, MarkKind, Point, Selection};

/// A span of characters sharing one mark set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TextRunRepr", into = "TextRunRepr")]
pub struct TextRun {
    pub text: SmolStr,
    pub marks: BTreeSet<MarkKind>,
}

impl TextRun {
    /// An unmarked run.
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            marks: BTreeSet::new(),
        }
    }

    pub fn with_mark(mut self, mark: MarkKind) -> Self {
        self.marks.insert(mark);
        self
    }

    pub fn has_mark(&self, mark: MarkKind) -> bool {
        self.marks.contains(&mark)
    }

    /// Length in chars (Unicode scalar values).
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Copy of the `char_range` slice of this run, keeping its marks.
    pub(crate) fn slice(&self, char_range: Range<usize>) -> Self {
        Self {
            text: slice_chars(&self.text, char_range),
            marks: self.marks.clone(),
        }
    }
}

/// Wire shape of a text run: marks are flattened into optional boolean keys.
#[derive(Serialize, Deserialize)]
struct TextRunRepr {
    text: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strikethrough: Option<bool>,
}

impl From<TextRunRepr> for TextRun {
    fn from(repr: TextRunRepr) -> Self {
        let flags = [
            (MarkKind::Bold, repr.bold),
            (MarkKind::Italic, repr.italic),
            (MarkKind::Underline, repr.underline),
            (MarkKind::Strikethrough, repr.strikethrough),
        ];
        Self {
            text: repr.text,
            marks: flags
                .into_iter()
                .filter(|(_, flag)| *flag == Some(true))
                .map(|(mark, _)| mark)
                .collect(),
        }
    }
}

impl From<TextRun> for TextRunRepr {
    fn from(run: TextRun) -> Self {
        let flag = |mark| run.marks.contains(&mark).then_some(true);
        Self {
            bold: flag(MarkKind::Bold),
            italic: flag(MarkKind::Italic),
            underline: flag(MarkKind::Underline),
            strikethrough: flag(MarkKind::Strikethrough),
            text: run.text,
        }
    }
}

/// A structural unit of the document: a paragraph, heading, or unclassified
/// block, holding at least one text run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockRepr", into = "BlockRepr")]
pub struct Block {
    kind: BlockKind,
    align: Alignment,
    children: Vec<TextRun>,
}

impl Block {
    /// Build a block from its runs. Fails when `children` is empty.
    pub fn new(kind: BlockKind, children: Vec<TextRun>) -> Result<Self> {
        if children.is_empty() {
            return Err(EditorError::InvalidDocument(
                "a block needs at least one text run".into(),
            ));
        }
        Ok(Self {
            kind,
            align: Alignment::None,
            children,
        })
    }

    /// A block holding a single unmarked run.
    pub fn text(kind: BlockKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            align: Alignment::None,
            children: vec![TextRun::new(text)],
        }
    }

    pub fn paragraph(text: impl Into<SmolStr>) -> Self {
        Self::text(BlockKind::Paragraph, text)
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn align(&self) -> Alignment {
        self.align
    }

    pub fn children(&self) -> &[TextRun] {
        &self.children
    }

    /// Concatenated text of all runs, marks discarded.
    pub fn string(&self) -> String {
        self.children.iter().map(|run| run.text.as_str()).collect()
    }

    /// Length in chars of the block's concatenated text.
    pub fn len_chars(&self) -> usize {
        self.children.iter().map(TextRun::len_chars).sum()
    }

    /// Runs paired with the char range they cover within the block.
    pub fn runs_with_ranges(&self) -> impl Iterator<Item = (Range<usize>, &TextRun)> {
        self.children.iter().scan(0, |pos, run| {
            let start = *pos;
            *pos += run.len_chars();
            Some((start..*pos, run))
        })
    }

    pub(crate) fn with_kind(&self, kind: BlockKind) -> Self {
        Self {
            kind,
            align: self.align,
            children: self.children.clone(),
        }
    }

    pub(crate) fn with_children(&self, children: Vec<TextRun>) -> Self {
        Self {
            kind: self.kind,
            align: self.align,
            children,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BlockRepr {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<BlockKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<Alignment>,
    children: Vec<TextRun>,
}

impl TryFrom<BlockRepr> for Block {
    type Error = EditorError;

    fn try_from(repr: BlockRepr) -> Result<Self> {
        Ok(Block::new(repr.kind.unwrap_or_default(), repr.children)?
            .with_align(repr.align.unwrap_or_default()))
    }
}

impl From<Block> for BlockRepr {
    fn from(block: Block) -> Self {
        Self {
            kind: (block.kind != BlockKind::Default).then_some(block.kind),
            align: (block.align != Alignment::None).then_some(block.align),
            children: block.children,
        }
    }
}

/// Borrowed view of any node in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    Block(&'a Block),
    Text(&'a TextRun),
}

impl Node<'_> {
    /// Text content of the node (runs concatenated for blocks).
    pub fn string(&self) -> String {
        match self {
            Node::Block(block) => block.string(),
            Node::Text(run) => run.text.to_string(),
        }
    }
}

/// The root of the tree: an ordered, non-empty sequence of blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Arc<Block>>", into = "Vec<Arc<Block>>")]
pub struct Document {
    blocks: Vec<Arc<Block>>,
}

impl Default for Document {
    /// One unclassified block with one empty run.
    fn default() -> Self {
        Self {
            blocks: vec![Arc::new(Block::text(BlockKind::Default, ""))],
        }
    }
}

impl Document {
    /// Build a document. Fails when `blocks` is empty.
    pub fn new(blocks: Vec<Block>) -> Result<Self> {
        Self::from_arcs(blocks.into_iter().map(Arc::new).collect())
    }

    pub(crate) fn from_arcs(blocks: Vec<Arc<Block>>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(EditorError::InvalidDocument(
                "a document needs at least one block".into(),
            ));
        }
        Ok(Self { blocks })
    }

    pub(crate) fn arcs(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> {
        self.blocks.iter().map(Arc::as_ref)
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a constructed document; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether block `index` is the same allocation in both documents.
    pub fn shares_block_with(&self, other: &Document, index: usize) -> bool {
        match (self.blocks.get(index), other.blocks.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Every node in document order: each block followed by its runs.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        self.blocks().flat_map(|block| {
            std::iter::once(Node::Block(block)).chain(block.children.iter().map(Node::Text))
        })
    }

    /// Check both points of `selection` against the tree.
    pub fn resolve(&self, selection: Selection) -> Result<ResolvedSelection> {
        for point in [selection.anchor, selection.focus] {
            let Some(block) = self.block(point.block) else {
                return Err(EditorError::invalid_selection(
                    point,
                    format!("document has {} blocks", self.len()),
                ));
            };
            let len = block.len_chars();
            if point.offset > len {
                return Err(EditorError::invalid_selection(
                    point,
                    format!("block {} is {} chars long", point.block, len),
                ));
            }
        }
        Ok(ResolvedSelection {
            start: selection.start(),
            end: selection.end(),
        })
    }
}

impl TryFrom<Vec<Arc<Block>>> for Document {
    type Error = EditorError;

    fn try_from(blocks: Vec<Arc<Block>>) -> Result<Self> {
        Self::from_arcs(blocks)
    }
}

impl From<Document> for Vec<Arc<Block>> {
    fn from(doc: Document) -> Self {
        doc.blocks
    }
}

/// A selection known to fit the document it was resolved against, with
/// ordered bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub start: Point,
    pub end: Point,
}

impl ResolvedSelection {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn blocks(&self) -> std::ops::RangeInclusive<usize> {
        self.start.block..=self.end.block
    }

    /// Char range selected within block `index` (whose length is `len`).
    pub fn span_in_block(&self, index: usize, len: usize) -> Range<usize> {
        let lo = if index == self.start.block {
            self.start.offset
        } else {
            0
        };
        let hi = if index == self.end.block {
            self.end.offset
        } else {
            len
        };
        lo..hi
    }
}

/// Slice by char offsets.
pub(crate) fn slice_chars(text: &str, char_range: Range<usize>) -> SmolStr {
    let byte_at = |char_offset: usize| {
        text.char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    SmolStr::new(&text[byte_at(char_range.start)..byte_at(char_range.end)])
}
