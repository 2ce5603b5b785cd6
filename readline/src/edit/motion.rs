// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cursor motions. A motion on its own moves the cursor. Combined with an operator it
//! describes the range to delete, change or yank.
//!
//! Two word definitions are supported:
//! - A *word* is a run of alphanumeric characters, so punctuation separates words.
//! - A *big word* is a run of non-whitespace characters.

use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Motion {
    BackwardChar,
    ForwardChar,
    BeginningOfLine,
    EndOfLine,
    /// Start of the previous word.
    BackwardWord,
    /// Start of the next word.
    ForwardWord,
    /// Just past the end of the current or next word.
    ForwardWordEnd,
    /// Start of the previous big word.
    BackwardBigWord,
    /// Start of the next big word.
    ForwardBigWord,
    /// The entire line, for `dd`, `cc` and `yy`.
    WholeLine,
}

fn is_word_char(ch: char) -> bool { ch.is_alphanumeric() }

impl Motion {
    /// Where the cursor lands when this motion starts at `cursor`.
    #[must_use]
    pub fn target(self, line: &[char], cursor: usize) -> usize {
        let len = line.len();
        let mut at = cursor.min(len);
        match self {
            Motion::BackwardChar => at.saturating_sub(1),
            Motion::ForwardChar => (at + 1).min(len),
            Motion::BeginningOfLine | Motion::WholeLine => 0,
            Motion::EndOfLine => len,
            Motion::BackwardWord => {
                while at > 0 && !is_word_char(line[at - 1]) {
                    at -= 1;
                }
                while at > 0 && is_word_char(line[at - 1]) {
                    at -= 1;
                }
                at
            }
            Motion::ForwardWord => {
                while at < len && is_word_char(line[at]) {
                    at += 1;
                }
                while at < len && !is_word_char(line[at]) {
                    at += 1;
                }
                at
            }
            Motion::ForwardWordEnd => {
                while at < len && !is_word_char(line[at]) {
                    at += 1;
                }
                while at < len && is_word_char(line[at]) {
                    at += 1;
                }
                at
            }
            Motion::BackwardBigWord => {
                // Whitespace right before the cursor first, then the big word itself.
                while at > 0 && line[at - 1].is_whitespace() {
                    at -= 1;
                }
                while at > 0 && !line[at - 1].is_whitespace() {
                    at -= 1;
                }
                at
            }
            Motion::ForwardBigWord => {
                while at < len && !line[at].is_whitespace() {
                    at += 1;
                }
                while at < len && line[at].is_whitespace() {
                    at += 1;
                }
                at
            }
        }
    }

    /// Half-open range covered by an operator combined with this motion.
    #[must_use]
    pub fn range(self, line: &[char], cursor: usize) -> (usize, usize) {
        if self == Motion::WholeLine {
            return (0, line.len());
        }
        let cursor = cursor.min(line.len());
        let target = self.target(line, cursor);
        (cursor.min(target), cursor.max(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn chars(text: &str) -> Vec<char> { text.chars().collect() }

    #[test]
    fn test_backward_big_word_skips_whitespace_then_word() {
        let line = chars("foo  bar");
        let first = Motion::BackwardBigWord.target(&line, 8);
        pretty_assertions::assert_eq!(first, 5);
        let second = Motion::BackwardBigWord.target(&line, first);
        pretty_assertions::assert_eq!(second, 0);
        pretty_assertions::assert_eq!(Motion::BackwardBigWord.target(&line, 0), 0);
    }

    #[test_case(Motion::BackwardWord, "foo.bar baz", 11 => 8)]
    #[test_case(Motion::BackwardWord, "foo.bar baz", 8 => 4 ; "punctuation separates words")]
    #[test_case(Motion::BackwardBigWord, "foo.bar baz", 8 => 0 ; "punctuation is part of a big word")]
    #[test_case(Motion::ForwardWord, "foo.bar baz", 0 => 4)]
    #[test_case(Motion::ForwardBigWord, "foo.bar baz", 0 => 8)]
    #[test_case(Motion::ForwardWordEnd, "foo.bar baz", 3 => 7)]
    #[test_case(Motion::ForwardWordEnd, "foo bar", 8 => 7 ; "past the end is clamped")]
    #[test_case(Motion::ForwardChar, "ab", 2 => 2)]
    #[test_case(Motion::BackwardChar, "ab", 0 => 0)]
    #[test_case(Motion::EndOfLine, "abc", 1 => 3)]
    fn test_target(motion: Motion, line: &str, cursor: usize) -> usize {
        motion.target(&chars(line), cursor)
    }

    #[test]
    fn test_targets_stay_in_bounds() {
        use strum::IntoEnumIterator;
        let line = chars("  a-b  c ");
        for motion in Motion::iter() {
            for cursor in 0..=line.len() + 1 {
                assert!(motion.target(&line, cursor) <= line.len(), "{motion} {cursor}");
            }
        }
    }

    #[test]
    fn test_range() {
        let line = chars("one two three");
        pretty_assertions::assert_eq!(Motion::ForwardWord.range(&line, 4), (4, 8));
        pretty_assertions::assert_eq!(Motion::BackwardWord.range(&line, 7), (4, 7));
        pretty_assertions::assert_eq!(Motion::WholeLine.range(&line, 5), (0, 13));
        pretty_assertions::assert_eq!(Motion::EndOfLine.range(&line, 8), (8, 13));
    }
}
