// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal column widths of codepoints. Wide glyphs (CJK, most emoji) take two
//! columns, combining marks and control codes take none.

use unicode_width::UnicodeWidthChar;

#[must_use]
pub fn char_display_width(ch: char) -> usize { ch.width().unwrap_or(0) }

#[must_use]
pub fn chars_display_width(chars: &[char]) -> usize {
    chars.iter().copied().map(char_display_width).sum()
}

#[must_use]
pub fn str_display_width(text: &str) -> usize { text.chars().map(char_display_width).sum() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(str_display_width("abc"), 3);
        assert_eq!(str_display_width("世界"), 4);
        assert_eq!(chars_display_width(&['e', '\u{301}']), 1);
        assert_eq!(char_display_width('\u{1b}'), 0);
    }
}
