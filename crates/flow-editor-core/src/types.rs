//! Core editor types: formatting kinds, points and selections.
//!
//! These types are framework-agnostic; hosts build them from whatever input
//! events they receive and pass them into the editor by value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Character-level formatting attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl MarkKind {
    pub const ALL: [MarkKind; 4] = [
        MarkKind::Bold,
        MarkKind::Italic,
        MarkKind::Underline,
        MarkKind::Strikethrough,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
        }
    }
}

/// Structural type of a block.
///
/// `Default` is the unclassified kind a block falls back to when its type is
/// toggled off. It has no persisted name.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    #[serde(skip)]
    Default,
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl BlockKind {
    /// Heading for a level in `1..=6`.
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Heading1),
            2 => Some(Self::Heading2),
            3 => Some(Self::Heading3),
            4 => Some(Self::Heading4),
            5 => Some(Self::Heading5),
            6 => Some(Self::Heading6),
            _ => None,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            Self::Heading4 => Some(4),
            Self::Heading5 => Some(5),
            Self::Heading6 => Some(6),
            Self::Default | Self::Paragraph => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Heading4 => "heading4",
            Self::Heading5 => "heading5",
            Self::Heading6 => "heading6",
        }
    }
}

/// Horizontal alignment of a block. `None` inherits from the host.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    #[serde(skip)]
    None,
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

impl FromStr for MarkKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkKind::ALL
            .into_iter()
            .find(|mark| mark.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EditorError::unknown_name("mark", s))
    }
}

impl FromStr for BlockKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paragraph" => Ok(Self::Paragraph),
            "heading1" => Ok(Self::Heading1),
            "heading2" => Ok(Self::Heading2),
            "heading3" => Ok(Self::Heading3),
            "heading4" => Ok(Self::Heading4),
            "heading5" => Ok(Self::Heading5),
            "heading6" => Ok(Self::Heading6),
            _ => Err(EditorError::unknown_name("block", s)),
        }
    }
}

impl FromStr for Alignment {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "justify" => Ok(Self::Justify),
            _ => Err(EditorError::unknown_name("alignment", s)),
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A position in the document.
///
/// `offset` is a character offset (NOT byte offset!) into the concatenated
/// text of the block at `block`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub block: usize,
    pub offset: usize,
}

impl Point {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

impl FromStr for Point {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (block, offset) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| EditorError::Parse(format!("expected `block:offset`, got `{s}`").into()))?;
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| EditorError::Parse(format!("`{part}` is not an index").into()))
        };
        Ok(Self::new(parse(block)?, parse(offset)?))
    }
}

/// Document selection with anchor and focus points.
///
/// The anchor is where the selection started, the focus is where it ends now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret).
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    /// Selection over `start..end` characters of a single block.
    pub fn within(block: usize, start: usize, end: usize) -> Self {
        Self::new(Point::new(block, start), Point::new(block, end))
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Check if the selection is backwards (focus before anchor).
    pub fn is_backwards(&self) -> bool {
        self.focus < self.anchor
    }

    /// Indices of the blocks this selection touches, in document order.
    pub fn blocks(&self) -> std::ops::RangeInclusive<usize> {
        self.start().block..=self.end().block
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.anchor)
        } else {
            write!(f, "{}-{}", self.anchor, self.focus)
        }
    }
}

/// Parses `block:offset` (caret) or `block:offset-block:offset`.
impl FromStr for Selection {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((anchor, focus)) => Ok(Self::new(anchor.parse()?, focus.parse()?)),
            None => Ok(Self::collapsed(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = Selection::new(Point::new(0, 5), Point::new(1, 2));
        assert_eq!(sel.start(), Point::new(0, 5));
        assert_eq!(sel.end(), Point::new(1, 2));
        assert!(!sel.is_backwards());

        // Backward selection
        let sel = Selection::new(Point::new(1, 2), Point::new(0, 5));
        assert_eq!(sel.start(), Point::new(0, 5));
        assert_eq!(sel.end(), Point::new(1, 2));
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(Point::new(2, 7));
        assert!(sel.is_collapsed());
        assert_eq!(sel.start(), sel.end());
        assert_eq!(sel.blocks(), 2..=2);
    }

    #[test]
    fn test_point_ordering_is_block_major() {
        assert!(Point::new(0, 100) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
    }

    #[test]
    fn test_selection_parse() {
        let sel: Selection = "0:0-1:3".parse().unwrap();
        assert_eq!(sel, Selection::new(Point::new(0, 0), Point::new(1, 3)));

        let caret: Selection = "4:2".parse().unwrap();
        assert!(caret.is_collapsed());
        assert_eq!(caret.to_string(), "4:2");

        assert!("4".parse::<Selection>().is_err());
        assert!("a:1".parse::<Selection>().is_err());
    }

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!("Bold".parse::<MarkKind>().unwrap(), MarkKind::Bold);
        assert_eq!("heading3".parse::<BlockKind>().unwrap(), BlockKind::Heading3);
        assert_eq!("JUSTIFY".parse::<Alignment>().unwrap(), Alignment::Justify);
        assert!("default".parse::<BlockKind>().is_err());
        assert!("none".parse::<Alignment>().is_err());
        assert!("blink".parse::<MarkKind>().is_err());
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6 {
            let kind = BlockKind::heading(level).unwrap();
            assert_eq!(kind.heading_level(), Some(level));
        }
        assert_eq!(BlockKind::heading(7), None);
        assert_eq!(BlockKind::Paragraph.heading_level(), None);
    }
}
