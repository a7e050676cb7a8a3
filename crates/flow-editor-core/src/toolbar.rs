//! Toolbar control state.
//!
//! The host renders one button per [`Control`]; this module only decides
//! which of them are pressed and which are disabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::commands::FormatCommand;
use crate::document::Document;
use crate::error::EditorError;
use crate::history::History;
use crate::query;
use crate::types::{Alignment, BlockKind, MarkKind, Selection};

/// Which mark controls the toolbar exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarVariant {
    /// Bold and italic.
    #[default]
    Basic,
    /// Bold, italic, underline and strikethrough.
    Extended,
}

impl ToolbarVariant {
    pub fn marks(self) -> &'static [MarkKind] {
        match self {
            Self::Basic => &[MarkKind::Bold, MarkKind::Italic],
            Self::Extended => &MarkKind::ALL,
        }
    }
}

impl FromStr for ToolbarVariant {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            _ => Err(EditorError::unknown_name("toolbar", s)),
        }
    }
}

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Undo,
    Redo,
    Format(FormatCommand),
}

impl Control {
    pub fn label(&self) -> String {
        match self {
            Control::Undo => "Undo".to_string(),
            Control::Redo => "Redo".to_string(),
            Control::Format(FormatCommand::ToggleMark(mark)) => capitalize(mark.name()),
            Control::Format(FormatCommand::ToggleBlock(kind)) => match kind.heading_level() {
                Some(level) => format!("Heading {level}"),
                None => capitalize(kind.name()),
            },
            Control::Format(FormatCommand::ToggleAlign(alignment)) => {
                capitalize(alignment.name())
            }
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub control: Control,
    /// Rendered as pressed (the format is active at the selection).
    pub pressed: bool,
    /// Rendered as disabled (nothing to undo/redo).
    pub disabled: bool,
}

/// Everything the host needs to render the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub controls: Vec<ControlState>,
}

impl ToolbarState {
    /// Compute control states. With no selection, formatting controls are
    /// not pressed.
    pub fn compute(
        variant: ToolbarVariant,
        doc: &Document,
        selection: Option<&Selection>,
        history: &History,
    ) -> Self {
        let can_undo = history.can_undo();
        let can_redo = history.can_redo();
        let controls = controls(variant)
            .into_iter()
            .map(|control| {
                let (pressed, disabled) = match control {
                    Control::Undo => (false, !can_undo),
                    Control::Redo => (false, !can_redo),
                    Control::Format(command) => {
                        (selection.is_some_and(|sel| is_active(doc, sel, command)), false)
                    }
                };
                ControlState {
                    control,
                    pressed,
                    disabled,
                }
            })
            .collect();
        Self {
            can_undo,
            can_redo,
            controls,
        }
    }

    pub fn get(&self, control: Control) -> Option<&ControlState> {
        self.controls.iter().find(|state| state.control == control)
    }

    pub fn is_pressed(&self, command: FormatCommand) -> bool {
        self.get(Control::Format(command))
            .is_some_and(|state| state.pressed)
    }
}

impl fmt::Display for ToolbarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.controls {
            let marker = if state.disabled {
                "-"
            } else if state.pressed {
                "*"
            } else {
                " "
            };
            writeln!(f, "[{marker}] {}", state.control.label())?;
        }
        Ok(())
    }
}

fn is_active(doc: &Document, selection: &Selection, command: FormatCommand) -> bool {
    match command {
        FormatCommand::ToggleMark(mark) => query::is_mark_active(doc, selection, mark),
        FormatCommand::ToggleBlock(kind) => query::is_block_active(doc, selection, kind),
        FormatCommand::ToggleAlign(alignment) => {
            query::is_align_active(doc, selection, alignment)
        }
    }
}

/// Controls in toolbar order.
pub fn controls(variant: ToolbarVariant) -> Vec<Control> {
    let mut controls = vec![Control::Undo, Control::Redo];
    controls.extend(
        variant
            .marks()
            .iter()
            .map(|mark| Control::Format(FormatCommand::ToggleMark(*mark))),
    );
    controls.push(Control::Format(FormatCommand::ToggleBlock(
        BlockKind::Paragraph,
    )));
    controls.extend(
        (1..=6)
            .rev()
            .filter_map(BlockKind::heading)
            .map(|kind| Control::Format(FormatCommand::ToggleBlock(kind))),
    );
    controls.extend(
        [
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justify,
        ]
        .into_iter()
        .map(|alignment| Control::Format(FormatCommand::ToggleAlign(alignment))),
    );
    controls
}
