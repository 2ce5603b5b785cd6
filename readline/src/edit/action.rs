// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Motion;
use strum_macros::Display;

/// What an action does to the line, which decides whether it also updates the yank
/// register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ActionStatus {
    Move,
    Delete,
    Change,
    Yank,
}

/// Which editing modes an action may be bound in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ModeApplicability {
    Emacs,
    Vi,
    Both,
}

/// A partition of a [`crate::KeyBindingTable`]. Emacs has one key map, Vi has one for
/// insert mode and one for command mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum KeyMap {
    Emacs,
    ViInsert,
    ViCommand,
}

impl KeyMap {
    #[must_use]
    pub fn accepts(self, applicability: ModeApplicability) -> bool {
        match applicability {
            ModeApplicability::Both => true,
            ModeApplicability::Emacs => self == KeyMap::Emacs,
            ModeApplicability::Vi => matches!(self, KeyMap::ViInsert | KeyMap::ViCommand),
        }
    }

    /// In vi command mode the cursor never goes past the last character.
    #[must_use]
    pub fn is_vi_command(self) -> bool { self == KeyMap::ViCommand }
}

/// Where the vi insert commands (`i`, `a`, `I`, `A`) put the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InsertPosition {
    AtCursor,
    AfterCursor,
    LineStart,
    LineEnd,
}

/// Commands bound to key sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EditAction {
    /// A motion, applied on its own (`Move`) or by an operator.
    Motion {
        motion: Motion,
        status: ActionStatus,
    },
    DeletePrevChar,
    DeleteChar,
    /// End of input on an empty line, [`EditAction::DeleteChar`] otherwise.
    EndOfFile,
    /// Toggle the case of the character under the cursor and step over it.
    ChangeCase,
    /// Replace the character under the cursor with the next typed character.
    ReplaceChar,
    /// Insert the yank register before the cursor, or after the character under it.
    Paste {
        after_cursor: bool,
    },
    InsertMode(InsertPosition),
    CommandMode,
    Complete,
    ClearScreen,
    PreviousHistory,
    NextHistory,
    /// The interrupt key arrived as a codepoint instead of a signal.
    Interrupt,
    ToggleRedirectionDetection,
}

impl EditAction {
    #[must_use]
    pub fn movement(motion: Motion) -> Self {
        EditAction::Motion {
            motion,
            status: ActionStatus::Move,
        }
    }

    #[must_use]
    pub fn delete(motion: Motion) -> Self {
        EditAction::Motion {
            motion,
            status: ActionStatus::Delete,
        }
    }

    #[must_use]
    pub fn change(motion: Motion) -> Self {
        EditAction::Motion {
            motion,
            status: ActionStatus::Change,
        }
    }

    #[must_use]
    pub fn yank(motion: Motion) -> Self {
        EditAction::Motion {
            motion,
            status: ActionStatus::Yank,
        }
    }

    #[must_use]
    pub fn applicability(&self) -> ModeApplicability {
        match self {
            EditAction::Motion { motion, status } => match status {
                ActionStatus::Change | ActionStatus::Yank => ModeApplicability::Vi,
                ActionStatus::Move | ActionStatus::Delete => {
                    if *motion == Motion::WholeLine {
                        ModeApplicability::Vi
                    } else {
                        ModeApplicability::Both
                    }
                }
            },
            EditAction::ChangeCase
            | EditAction::ReplaceChar
            | EditAction::InsertMode(_)
            | EditAction::CommandMode => ModeApplicability::Vi,
            EditAction::ToggleRedirectionDetection => ModeApplicability::Emacs,
            EditAction::DeletePrevChar
            | EditAction::DeleteChar
            | EditAction::EndOfFile
            | EditAction::Paste { .. }
            | EditAction::Complete
            | EditAction::ClearScreen
            | EditAction::PreviousHistory
            | EditAction::NextHistory
            | EditAction::Interrupt => ModeApplicability::Both,
        }
    }

    #[must_use]
    pub fn status(&self) -> ActionStatus {
        match self {
            EditAction::Motion { status, .. } => *status,
            EditAction::DeletePrevChar | EditAction::DeleteChar | EditAction::EndOfFile => {
                ActionStatus::Delete
            }
            EditAction::ChangeCase | EditAction::ReplaceChar | EditAction::Paste { .. } => {
                ActionStatus::Change
            }
            _ => ActionStatus::Move,
        }
    }

    /// Operators store the text they cover in the yank register.
    #[must_use]
    pub fn updates_yank_register(&self) -> bool {
        matches!(self, EditAction::Motion { status, .. } if *status != ActionStatus::Move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_gating() {
        assert!(KeyMap::Emacs.accepts(EditAction::delete(Motion::BackwardBigWord).applicability()));
        assert!(!KeyMap::Emacs.accepts(EditAction::change(Motion::ForwardWord).applicability()));
        assert!(!KeyMap::Emacs.accepts(EditAction::ChangeCase.applicability()));
        assert!(!KeyMap::ViCommand.accepts(EditAction::ToggleRedirectionDetection.applicability()));
        assert!(KeyMap::ViInsert.accepts(EditAction::DeletePrevChar.applicability()));
        assert!(KeyMap::ViCommand.accepts(EditAction::delete(Motion::WholeLine).applicability()));
    }

    #[test]
    fn test_status_and_yank_register() {
        assert_eq!(EditAction::movement(Motion::ForwardChar).status(), ActionStatus::Move);
        assert!(!EditAction::movement(Motion::ForwardChar).updates_yank_register());
        assert!(EditAction::delete(Motion::ForwardWord).updates_yank_register());
        assert!(EditAction::yank(Motion::EndOfLine).updates_yank_register());
        assert_eq!(EditAction::ReplaceChar.status(), ActionStatus::Change);
        assert_eq!(EditAction::DeleteChar.status(), ActionStatus::Delete);
        assert!(!EditAction::DeleteChar.updates_yank_register());
    }
}
