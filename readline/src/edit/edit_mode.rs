// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditAction, KeyBindingError, KeyBindingTable, KeyMap};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    Emacs,
    Vi,
}

impl Default for Mode {
    #[cfg(feature = "emacs")]
    fn default() -> Self { Mode::Emacs }

    #[cfg(not(feature = "emacs"))]
    fn default() -> Self { Mode::Vi }
}

/// The editing mode of a [`crate::Readline`] and its key bindings. The default is
/// Emacs, or Vi when the `emacs` feature is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditMode {
    mode: Mode,
    bindings: KeyBindingTable,
}

impl Default for EditMode {
    fn default() -> Self { Self::of(Mode::default()) }
}

impl EditMode {
    #[must_use]
    pub fn emacs() -> Self { Self::of(Mode::Emacs) }

    #[must_use]
    pub fn vi() -> Self { Self::of(Mode::Vi) }

    #[must_use]
    pub fn of(mode: Mode) -> Self {
        let bindings = match mode {
            Mode::Emacs => KeyBindingTable::emacs(),
            Mode::Vi => KeyBindingTable::vi(),
        };
        Self { mode, bindings }
    }

    #[must_use]
    pub fn builder() -> EditModeBuilder { EditModeBuilder::default() }

    #[must_use]
    pub fn mode(&self) -> Mode { self.mode }

    #[must_use]
    pub fn bindings(&self) -> &KeyBindingTable { &self.bindings }

    /// Key map in effect when a line read starts.
    #[must_use]
    pub fn initial_key_map(&self) -> KeyMap {
        match self.mode {
            Mode::Emacs => KeyMap::Emacs,
            Mode::Vi => KeyMap::ViInsert,
        }
    }
}

/// Build an [`EditMode`] from one of the default tables plus overrides.
///
/// ```
/// use r3bl_readline::{EditAction, EditMode, KeyMap, Mode, Motion};
///
/// let edit_mode = EditMode::builder()
///     .mode(Mode::Vi)
///     .key_binding(KeyMap::ViCommand, &['g', 'h'], EditAction::movement(Motion::BeginningOfLine))
///     .build()
///     .unwrap();
/// assert_eq!(edit_mode.mode(), Mode::Vi);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditModeBuilder {
    mode: Mode,
    overrides: Vec<(KeyMap, Vec<char>, EditAction)>,
}

impl EditModeBuilder {
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn key_binding(mut self, key_map: KeyMap, keys: &[char], action: EditAction) -> Self {
        self.overrides.push((key_map, keys.to_vec(), action));
        self
    }

    /// # Errors
    ///
    /// Returns the first override that can not be bound, see [`KeyBindingTable::bind`].
    pub fn build(self) -> Result<EditMode, KeyBindingError> {
        let mut edit_mode = EditMode::of(self.mode);
        for (key_map, keys, action) in self.overrides {
            edit_mode.bindings.bind(key_map, &keys, action)?;
        }
        Ok(edit_mode)
    }
}
