// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

#[allow(clippy::wildcard_imports)]
use crate::keys::*;
use crate::{EditAction, InsertPosition, KeyMap, Motion, ok};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Codepoints a terminal sends for one key press. Most fit inline.
pub type KeySequence = SmallVec<[char; 4]>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyBindingError {
    #[error("{action} can not be bound in the {key_map} key map")]
    ModeMismatch { action: EditAction, key_map: KeyMap },

    #[error("can not bind an empty key sequence")]
    EmptySequence,
}

/// Outcome of looking up the codepoints at the front of the pending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The first `len` codepoints are bound to `action`.
    Matched { len: usize, action: EditAction },
    /// All the pending codepoints are the start of a longer binding.
    Incomplete,
    /// The first codepoint does not start any binding.
    Unbound,
}

/// Bindings from key sequences to [`EditAction`]s, partitioned by [`KeyMap`]. An
/// action can only be bound in the key maps of the modes it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBindingTable {
    bindings: HashMap<KeyMap, HashMap<KeySequence, EditAction>>,
}

impl KeyBindingTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// # Errors
    ///
    /// Returns an error if `keys` is empty, or if `action` is not available in the mode
    /// that `key_map` belongs to.
    pub fn bind(
        &mut self,
        key_map: KeyMap,
        keys: &[char],
        action: EditAction,
    ) -> Result<(), KeyBindingError> {
        if keys.is_empty() {
            return Err(KeyBindingError::EmptySequence);
        }
        if !key_map.accepts(action.applicability()) {
            return Err(KeyBindingError::ModeMismatch { action, key_map });
        }
        self.bindings
            .entry(key_map)
            .or_default()
            .insert(KeySequence::from_slice(keys), action);
        ok!()
    }

    pub fn unbind(&mut self, key_map: KeyMap, keys: &[char]) -> Option<EditAction> {
        self.bindings.get_mut(&key_map)?.remove(keys)
    }

    #[must_use]
    pub fn get(&self, key_map: KeyMap, keys: &[char]) -> Option<EditAction> {
        self.bindings.get(&key_map)?.get(keys).copied()
    }

    #[must_use]
    pub fn len(&self, key_map: KeyMap) -> usize {
        self.bindings.get(&key_map).map_or(0, HashMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bindings.values().all(HashMap::is_empty) }

    /// `true` if some binding is longer than `keys` and starts with it.
    #[must_use]
    pub fn is_strict_prefix(&self, key_map: KeyMap, keys: &[char]) -> bool {
        self.bindings.get(&key_map).is_some_and(|map| {
            map.keys()
                .any(|bound| bound.len() > keys.len() && bound.starts_with(keys))
        })
    }

    /// `true` if some binding starts with `ch`.
    #[must_use]
    pub fn starts_binding(&self, key_map: KeyMap, ch: char) -> bool {
        self.bindings
            .get(&key_map)
            .is_some_and(|map| map.keys().any(|bound| bound.first() == Some(&ch)))
    }

    #[must_use]
    pub fn max_len(&self, key_map: KeyMap) -> usize {
        self.bindings
            .get(&key_map)
            .and_then(|map| map.keys().map(SmallVec::len).max())
            .unwrap_or(0)
    }

    /// Resolve the front of `pending`, preferring the longest bound sequence.
    ///
    /// When all of `pending` could still grow into a longer binding the result is
    /// [`Resolution::Incomplete`], unless all of `pending` is itself bound. In that
    /// case the end of the chunk decides, and the shorter binding wins.
    #[must_use]
    pub fn resolve(&self, key_map: KeyMap, pending: &[char]) -> Resolution {
        if pending.is_empty() {
            return Resolution::Incomplete;
        }

        let longest = (1..=pending.len().min(self.max_len(key_map)))
            .rev()
            .find_map(|len| {
                self.get(key_map, &pending[..len])
                    .map(|action| (len, action))
            });
        let waiting = self.is_strict_prefix(key_map, pending);

        match (longest, waiting) {
            (Some((len, action)), false) => Resolution::Matched { len, action },
            (Some((len, action)), true) if len == pending.len() => {
                Resolution::Matched { len, action }
            }
            (_, true) => Resolution::Incomplete,
            (None, false) => Resolution::Unbound,
        }
    }

    /// Bindings in the spirit of GNU readline's emacs mode.
    #[must_use]
    pub fn emacs() -> Self {
        use EditAction as A;
        use Motion as M;

        let mut table = Self::new();
        let mut bind = |keys: &[char], action: EditAction| {
            table.bindings
                .entry(KeyMap::Emacs)
                .or_default()
                .insert(KeySequence::from_slice(keys), action);
        };

        bind(&[CTRL_A], A::movement(M::BeginningOfLine));
        bind(&[CTRL_E], A::movement(M::EndOfLine));
        bind(&[CTRL_B], A::movement(M::BackwardChar));
        bind(&[CTRL_F], A::movement(M::ForwardChar));
        bind(LEFT, A::movement(M::BackwardChar));
        bind(LEFT_APP, A::movement(M::BackwardChar));
        bind(RIGHT, A::movement(M::ForwardChar));
        bind(RIGHT_APP, A::movement(M::ForwardChar));
        bind(ALT_B, A::movement(M::BackwardWord));
        bind(ALT_F, A::movement(M::ForwardWordEnd));
        bind(CTRL_LEFT, A::movement(M::BackwardBigWord));
        bind(CTRL_RIGHT, A::movement(M::ForwardBigWord));
        for keys in HOME {
            bind(keys, A::movement(M::BeginningOfLine));
        }
        for keys in END {
            bind(keys, A::movement(M::EndOfLine));
        }

        bind(&[BACKSPACE], A::DeletePrevChar);
        bind(&[CTRL_H], A::DeletePrevChar);
        bind(DELETE, A::DeleteChar);
        bind(&[CTRL_D], A::EndOfFile);
        bind(&[CTRL_K], A::delete(M::EndOfLine));
        bind(&[CTRL_U], A::delete(M::BeginningOfLine));
        bind(&[CTRL_W], A::delete(M::BackwardBigWord));
        bind(ALT_D, A::delete(M::ForwardWordEnd));
        bind(ALT_BACKSPACE, A::delete(M::BackwardWord));
        bind(&[CTRL_Y], A::Paste {
            after_cursor: false,
        });

        bind(&[TAB], A::Complete);
        bind(&[CTRL_L], A::ClearScreen);
        bind(&[CTRL_C], A::Interrupt);
        bind(UP, A::PreviousHistory);
        bind(UP_APP, A::PreviousHistory);
        bind(&[CTRL_P], A::PreviousHistory);
        bind(DOWN, A::NextHistory);
        bind(DOWN_APP, A::NextHistory);
        bind(&[CTRL_N], A::NextHistory);
        bind(&[CTRL_X, 'r'], A::ToggleRedirectionDetection);

        table
    }

    /// Bindings in the spirit of vi: insert mode for typing, command mode (entered
    /// with `Esc`) for motions and operators.
    #[must_use]
    pub fn vi() -> Self {
        use EditAction as A;
        use Motion as M;

        let mut table = Self::new();
        let mut bind = |key_map: KeyMap, keys: &[char], action: EditAction| {
            table.bindings
                .entry(key_map)
                .or_default()
                .insert(KeySequence::from_slice(keys), action);
        };

        // Shared by both vi key maps.
        for key_map in [KeyMap::ViInsert, KeyMap::ViCommand] {
            bind(key_map, LEFT, A::movement(M::BackwardChar));
            bind(key_map, LEFT_APP, A::movement(M::BackwardChar));
            bind(key_map, RIGHT, A::movement(M::ForwardChar));
            bind(key_map, RIGHT_APP, A::movement(M::ForwardChar));
            for keys in HOME {
                bind(key_map, keys, A::movement(M::BeginningOfLine));
            }
            for keys in END {
                bind(key_map, keys, A::movement(M::EndOfLine));
            }
            bind(key_map, DELETE, A::DeleteChar);
            bind(key_map, &[CTRL_D], A::EndOfFile);
            bind(key_map, &[CTRL_L], A::ClearScreen);
            bind(key_map, &[CTRL_C], A::Interrupt);
            bind(key_map, UP, A::PreviousHistory);
            bind(key_map, UP_APP, A::PreviousHistory);
            bind(key_map, DOWN, A::NextHistory);
            bind(key_map, DOWN_APP, A::NextHistory);
            bind(key_map, &[ESC], A::CommandMode);
        }

        // Insert mode.
        let key_map = KeyMap::ViInsert;
        bind(key_map, &[BACKSPACE], A::DeletePrevChar);
        bind(key_map, &[CTRL_H], A::DeletePrevChar);
        bind(key_map, &[CTRL_W], A::delete(M::BackwardBigWord));
        bind(key_map, &[CTRL_U], A::delete(M::BeginningOfLine));
        bind(key_map, &[TAB], A::Complete);

        // Command mode.
        let key_map = KeyMap::ViCommand;
        for (key, motion) in [
            ('h', M::BackwardChar),
            ('l', M::ForwardChar),
            (' ', M::ForwardChar),
            ('0', M::BeginningOfLine),
            ('^', M::BeginningOfLine),
            ('$', M::EndOfLine),
            ('w', M::ForwardWord),
            ('b', M::BackwardWord),
            ('e', M::ForwardWordEnd),
            ('W', M::ForwardBigWord),
            ('B', M::BackwardBigWord),
        ] {
            bind(key_map, &[key], A::movement(motion));
            bind(key_map, &['d', key], A::delete(motion));
            bind(key_map, &['y', key], A::yank(motion));
            // `cw` changes up to the end of the word, like `ce`.
            let change_motion = if motion == M::ForwardWord { M::ForwardWordEnd } else { motion };
            bind(key_map, &['c', key], A::change(change_motion));
        }
        bind(key_map, &[BACKSPACE], A::movement(M::BackwardChar));
        bind(key_map, &['d', 'd'], A::delete(M::WholeLine));
        bind(key_map, &['c', 'c'], A::change(M::WholeLine));
        bind(key_map, &['y', 'y'], A::yank(M::WholeLine));
        bind(key_map, &['D'], A::delete(M::EndOfLine));
        bind(key_map, &['C'], A::change(M::EndOfLine));
        bind(key_map, &['x'], A::DeleteChar);
        bind(key_map, &['X'], A::DeletePrevChar);
        bind(key_map, &['~'], A::ChangeCase);
        bind(key_map, &['r'], A::ReplaceChar);
        bind(key_map, &['p'], A::Paste { after_cursor: true });
        bind(key_map, &['P'], A::Paste {
            after_cursor: false,
        });
        bind(key_map, &['i'], A::InsertMode(InsertPosition::AtCursor));
        bind(key_map, &['a'], A::InsertMode(InsertPosition::AfterCursor));
        bind(key_map, &['I'], A::InsertMode(InsertPosition::LineStart));
        bind(key_map, &['A'], A::InsertMode(InsertPosition::LineEnd));
        bind(key_map, &['k'], A::PreviousHistory);
        bind(key_map, &['j'], A::NextHistory);

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModeApplicability;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bind_rejects_actions_from_other_modes() {
        let mut table = KeyBindingTable::new();
        assert_eq!(
            table.bind(KeyMap::Emacs, &['~'], EditAction::ChangeCase),
            Err(KeyBindingError::ModeMismatch {
                action: EditAction::ChangeCase,
                key_map: KeyMap::Emacs
            })
        );
        assert!(
            table
                .bind(KeyMap::ViCommand, &[CTRL_X, 'r'], EditAction::ToggleRedirectionDetection)
                .is_err()
        );
        assert_eq!(
            table.bind(KeyMap::Emacs, &[], EditAction::Complete),
            Err(KeyBindingError::EmptySequence)
        );
        assert!(table.bind(KeyMap::Emacs, &['\u{0f}'], EditAction::Complete).is_ok());
        assert_eq!(table.get(KeyMap::Emacs, &['\u{0f}']), Some(EditAction::Complete));
        assert_eq!(table.unbind(KeyMap::Emacs, &['\u{0f}']), Some(EditAction::Complete));
        assert!(table.is_empty());
    }

    #[test]
    fn test_default_tables_respect_mode_gating() {
        let emacs = KeyBindingTable::emacs();
        let vi = KeyBindingTable::vi();
        for (table, key_map) in [
            (&emacs, KeyMap::Emacs),
            (&vi, KeyMap::ViInsert),
            (&vi, KeyMap::ViCommand),
        ] {
            let map = table.bindings.get(&key_map).cloned().unwrap_or_default();
            assert!(!map.is_empty());
            for action in map.values() {
                assert!(key_map.accepts(action.applicability()), "{action} in {key_map}");
            }
        }
        assert!(
            vi.bindings
                .values()
                .flat_map(HashMap::values)
                .all(|action| action.applicability() != ModeApplicability::Emacs)
        );
    }

    #[test]
    fn test_resolve_prefers_longest_match() {
        let table = KeyBindingTable::emacs();
        let pending = [ESC, '[', 'D', 'x'];
        assert_eq!(
            table.resolve(KeyMap::Emacs, &pending),
            Resolution::Matched {
                len: 3,
                action: EditAction::movement(Motion::BackwardChar)
            }
        );
    }

    #[test]
    fn test_resolve_waits_for_the_rest_of_a_sequence() {
        let table = KeyBindingTable::emacs();
        assert_eq!(table.resolve(KeyMap::Emacs, &[ESC]), Resolution::Incomplete);
        assert_eq!(table.resolve(KeyMap::Emacs, &[ESC, '[']), Resolution::Incomplete);
        assert_eq!(table.resolve(KeyMap::Emacs, &[CTRL_X]), Resolution::Incomplete);
        assert_eq!(table.resolve(KeyMap::Emacs, &[ESC, 'q']), Resolution::Unbound);
        assert_eq!(table.resolve(KeyMap::Emacs, &['a']), Resolution::Unbound);
    }

    #[test]
    fn test_resolve_bound_prefix_at_end_of_chunk() {
        let table = KeyBindingTable::vi();
        // A lone escape is bound and could start an arrow key. At the end of a chunk
        // it resolves to itself.
        assert_eq!(
            table.resolve(KeyMap::ViInsert, &[ESC]),
            Resolution::Matched {
                len: 1,
                action: EditAction::CommandMode
            }
        );
        // Followed by `[` it keeps waiting for the arrow key.
        assert_eq!(table.resolve(KeyMap::ViInsert, &[ESC, '[']), Resolution::Incomplete);
        // Followed by anything else the escape resolves on its own.
        assert_eq!(
            table.resolve(KeyMap::ViInsert, &[ESC, 'i']),
            Resolution::Matched {
                len: 1,
                action: EditAction::CommandMode
            }
        );
    }

    #[test]
    fn test_vi_operators() {
        let table = KeyBindingTable::vi();
        assert_eq!(
            table.get(KeyMap::ViCommand, &['d', 'B']),
            Some(EditAction::delete(Motion::BackwardBigWord))
        );
        assert_eq!(
            table.get(KeyMap::ViCommand, &['c', 'w']),
            Some(EditAction::change(Motion::ForwardWordEnd))
        );
        assert_eq!(table.resolve(KeyMap::ViCommand, &['d']), Resolution::Incomplete);
        assert_eq!(table.resolve(KeyMap::ViCommand, &['d', 'z']), Resolution::Unbound);
        assert!(table.starts_binding(KeyMap::ViCommand, 'd'));
        assert!(!table.starts_binding(KeyMap::ViInsert, 'd'));
    }
}
