//! Keyboard shortcuts.
//!
//! Maps key combinations to [`Command`]s. The host decodes its native key
//! event into a [`KeyCombo`], looks it up here and attaches its current
//! selection to the result.

use std::collections::HashMap;

use crate::actions::{Command, Key, KeyCombo};
use crate::commands::FormatCommand;
use crate::toolbar::ToolbarVariant;
use crate::types::{BlockKind, MarkKind};

/// Key bindings for one platform.
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, Command>,
}

impl KeybindingConfig {
    /// The editor's standard shortcuts.
    ///
    /// - primary + `b`/`i` for bold/italic (+ `u`/`s` with the extended toolbar)
    /// - primary + Alt + `0`..`6` for paragraph and heading1..heading6
    /// - primary + `z` to undo, primary + Shift + `z` or primary + `y` to redo
    pub fn default_for_platform(is_mac: bool, variant: ToolbarVariant) -> Self {
        let mut config = Self::default();

        for mark in variant.marks() {
            let letter = match mark {
                MarkKind::Bold => "b",
                MarkKind::Italic => "i",
                MarkKind::Underline => "u",
                MarkKind::Strikethrough => "s",
            };
            config.bind(
                KeyCombo::primary(Key::character(letter), is_mac),
                Command::Format(FormatCommand::ToggleMark(*mark)),
            );
        }

        config.bind(
            KeyCombo::primary_alt(Key::character("0"), is_mac),
            Command::Format(FormatCommand::ToggleBlock(BlockKind::Paragraph)),
        );
        for level in 1..=6u8 {
            if let Some(kind) = BlockKind::heading(level) {
                config.bind(
                    KeyCombo::primary_alt(Key::character(level.to_string()), is_mac),
                    Command::Format(FormatCommand::ToggleBlock(kind)),
                );
            }
        }

        config.bind(KeyCombo::primary(Key::character("z"), is_mac), Command::Undo);
        config.bind(
            KeyCombo::primary_shift(Key::character("z"), is_mac),
            Command::Redo,
        );
        config.bind(KeyCombo::primary(Key::character("y"), is_mac), Command::Redo);

        config
    }

    /// Add or replace a binding.
    pub fn bind(&mut self, combo: KeyCombo, command: Command) {
        self.bindings.insert(normalize(combo), command);
    }

    pub fn unbind(&mut self, combo: &KeyCombo) -> Option<Command> {
        self.bindings.remove(&normalize(combo.clone()))
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<Command> {
        self.bindings.get(&normalize(combo.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Lowercase character keys so lookups ignore caps lock and shifted letters.
fn normalize(combo: KeyCombo) -> KeyCombo {
    match combo.key {
        Key::Character(c) => KeyCombo::with_modifiers(Key::character(c), combo.modifiers),
        _ => combo,
    }
}
