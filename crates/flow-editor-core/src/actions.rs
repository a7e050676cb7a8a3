//! Editor actions and key input types.
//!
//! `EditorAction` is what the host hands to [`crate::EditorState::execute`]:
//! a command together with the selection it applies to. `Command` is the
//! selection-free form that toolbar buttons and key bindings produce.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::commands::FormatCommand;
use crate::error::EditorError;
use crate::types::{Alignment, BlockKind, MarkKind, Selection};

/// A command requested by the host, without a selection attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Format(FormatCommand),
    Undo,
    Redo,
}

impl Command {
    /// Attach the host's current selection.
    pub fn with_selection(self, selection: Selection) -> EditorAction {
        match self {
            Command::Format(command) => EditorAction::format(command, selection),
            Command::Undo => EditorAction::Undo,
            Command::Redo => EditorAction::Redo,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Format(FormatCommand::ToggleMark(mark)) => mark.name(),
            Command::Format(FormatCommand::ToggleBlock(kind)) => kind.name(),
            Command::Format(FormatCommand::ToggleAlign(alignment)) => alignment.name(),
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }
}

/// Resolves a command name: a mark, block kind or alignment name, or
/// `undo`/`redo`.
impl FromStr for Command {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("undo") {
            return Ok(Command::Undo);
        }
        if name.eq_ignore_ascii_case("redo") {
            return Ok(Command::Redo);
        }
        if let Ok(mark) = name.parse::<MarkKind>() {
            return Ok(Command::Format(FormatCommand::ToggleMark(mark)));
        }
        if let Ok(kind) = name.parse::<BlockKind>() {
            return Ok(Command::Format(FormatCommand::ToggleBlock(kind)));
        }
        if let Ok(alignment) = name.parse::<Alignment>() {
            return Ok(Command::Format(FormatCommand::ToggleAlign(alignment)));
        }
        Err(EditorError::unknown_name("command", name))
    }
}

/// All possible editor actions.
///
/// Formatting actions carry the selection they apply to; history actions
/// operate on the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Toggle a character mark over the selection.
    ToggleMark { mark: MarkKind, selection: Selection },

    /// Toggle the block kind of every block in the selection.
    ToggleBlock { kind: BlockKind, selection: Selection },

    /// Toggle the alignment of every block in the selection.
    ToggleAlign {
        alignment: Alignment,
        selection: Selection,
    },

    /// Undo the last change.
    Undo,

    /// Redo the last undone change.
    Redo,
}

impl EditorAction {
    pub fn format(command: FormatCommand, selection: Selection) -> Self {
        match command {
            FormatCommand::ToggleMark(mark) => Self::ToggleMark { mark, selection },
            FormatCommand::ToggleBlock(kind) => Self::ToggleBlock { kind, selection },
            FormatCommand::ToggleAlign(alignment) => Self::ToggleAlign {
                alignment,
                selection,
            },
        }
    }

    /// The selection a formatting action applies to.
    pub fn selection(&self) -> Option<Selection> {
        match self {
            Self::ToggleMark { selection, .. }
            | Self::ToggleBlock { selection, .. }
            | Self::ToggleAlign { selection, .. } => Some(*selection),
            Self::Undo | Self::Redo => None,
        }
    }

    /// The command without its selection.
    pub fn command(&self) -> Command {
        match *self {
            Self::ToggleMark { mark, .. } => Command::Format(FormatCommand::ToggleMark(mark)),
            Self::ToggleBlock { kind, .. } => Command::Format(FormatCommand::ToggleBlock(kind)),
            Self::ToggleAlign { alignment, .. } => {
                Command::Format(FormatCommand::ToggleAlign(alignment))
            }
            Self::Undo => Command::Undo,
            Self::Redo => Command::Redo,
        }
    }
}

impl fmt::Display for EditorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.selection() {
            Some(selection) => write!(f, "{}@{}", self.command().name(), selection),
            None => f.write_str(self.command().name()),
        }
    }
}

/// Parses `undo`, `redo`, or `<name>@<selection>` such as `bold@0:0-0:5`.
impl FromStr for EditorAction {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, selection) = match s.split_once('@') {
            Some((name, selection)) => (name, Some(selection.parse::<Selection>()?)),
            None => (s, None),
        };
        match (name.parse::<Command>()?, selection) {
            (Command::Undo, None) => Ok(EditorAction::Undo),
            (Command::Redo, None) => Ok(EditorAction::Redo),
            (Command::Format(command), Some(selection)) => {
                Ok(EditorAction::format(command, selection))
            }
            (Command::Format(_), None) => Err(EditorError::Parse(
                format!("`{s}` needs a selection, e.g. `{name}@0:0-0:5`").into(),
            )),
            (_, Some(_)) => Err(EditorError::Parse(
                format!("`{name}` does not take a selection").into(),
            )),
        }
    }
}

/// Key values for keyboard input.
///
/// Platform-agnostic key representation. Platform-specific code converts
/// from native key events to this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key. Letters are stored lowercase so that
    /// `Shift+Z` and `z` name the same key.
    pub fn character(s: impl AsRef<str>) -> Self {
        Self::Character(SmolStr::new(s.as_ref().to_lowercase()))
    }

    /// Decode a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            "" | "Unidentified" => Self::Unidentified,
            other if other.chars().count() == 1 => Self::character(other),
            _ => Self::Unidentified,
        }
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    pub fn with_alt(self) -> Self {
        Self { alt: true, ..self }
    }

    pub fn with_shift(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    pub fn primary_alt(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac).with_alt(),
        }
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac).with_shift(),
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}
