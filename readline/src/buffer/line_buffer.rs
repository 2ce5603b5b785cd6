// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CONTINUATION_PROMPT, LINE_CONTINUATION_MARKER, Prompt, char_display_width,
            chars_display_width, clamp_move, reposition, str_display_width};

/// The line being edited: content, cursor, active prompt, multi-line accumulator and
/// the bookkeeping the renderer needs to pick a minimal redraw.
///
/// # Cursor
///
/// The cursor is a codepoint index into the content, `0 ..= len`. It is converted to
/// terminal columns (accounting for wide glyphs and the prompt) by
/// [`Self::cursor_with_prompt`].
///
/// # Zero mask
///
/// When the prompt masks with [`crate::ZERO_MASK`], [`Self::length`] reports `1` and
/// [`Self::cursor`] reports `0` whatever is typed. Nothing about the hidden content
/// reaches the terminal. Insertions and deletions still operate on the real content
/// and the real cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    line: Vec<char>,
    cursor: usize,
    prompt: Prompt,
    /// Signed length of the most recent insertion (positive) or deletion (negative).
    delta: isize,
    disable_prompt: bool,
    multi_line: bool,
    multi_line_buffer: String,
}

impl LineBuffer {
    #[must_use]
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &Prompt { &self.prompt }

    #[must_use]
    pub fn is_masking(&self) -> bool { self.prompt.is_masking() }

    #[must_use]
    pub fn is_zero_masked(&self) -> bool { self.prompt.is_zero_masked() }

    /// Editable length. `1` while zero masked.
    #[must_use]
    pub fn length(&self) -> usize {
        if self.is_zero_masked() { 1 } else { self.line.len() }
    }

    /// Visible cursor. `0` while zero masked.
    #[must_use]
    pub fn cursor(&self) -> usize {
        if self.is_zero_masked() { 0 } else { self.cursor }
    }

    /// Cursor into the real content, regardless of masking.
    #[must_use]
    pub fn real_cursor(&self) -> usize { self.cursor }

    /// Number of codepoints in the real content, regardless of masking.
    #[must_use]
    pub fn content_len(&self) -> usize { self.line.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.line.is_empty() }

    /// The real content.
    #[must_use]
    pub fn chars(&self) -> &[char] { &self.line }

    #[must_use]
    pub fn delta(&self) -> isize { self.delta }

    pub fn clear_delta(&mut self) { self.delta = 0; }

    /// Insert at the cursor and advance it past the inserted text.
    pub fn write(&mut self, text: &str) {
        let chars = text.chars().collect::<Vec<_>>();
        self.write_chars(&chars);
    }

    pub fn write_char(&mut self, ch: char) { self.write_chars(&[ch]); }

    pub fn write_chars(&mut self, chars: &[char]) {
        let at = self.cursor.min(self.line.len());
        let tail = self.line.split_off(at);
        self.line.extend_from_slice(chars);
        self.line.extend(tail);
        self.cursor = at + chars.len();
        self.delta = isize::try_from(chars.len()).unwrap_or(isize::MAX);
    }

    /// Remove the half-open range `start..end`, clamped to the content.
    ///
    /// A cursor before the range is unaffected, a cursor inside it moves to `start`,
    /// and a cursor after it shifts left by the removed length.
    pub fn delete(&mut self, start: usize, end: usize) {
        let end = end.min(self.line.len());
        let start = start.min(end);
        let removed = end - start;
        self.line.drain(start..end);
        self.delta = -isize::try_from(removed).unwrap_or(isize::MAX);

        if self.cursor >= end {
            self.cursor -= removed;
        } else if self.cursor > start {
            self.cursor = start;
        }
    }

    /// Text that [`Self::delete`] would remove, used for the yank register.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.line.len());
        self.line[start.min(end)..end].iter().collect()
    }

    /// Clear everything and swap to `prompt` (or an empty prompt).
    pub fn reset(&mut self, prompt: Option<Prompt>) {
        *self = Self::new(prompt.unwrap_or_default());
    }

    /// Swap the prompt. With no content this is [`Self::reset`]. Otherwise only the
    /// decoration changes, and content and cursor are kept.
    pub fn update_prompt(&mut self, prompt: Prompt) {
        if self.line.is_empty() {
            self.reset(Some(prompt));
        } else {
            self.prompt = prompt;
        }
    }

    /// Move the live line into the multi-line accumulator and start an empty
    /// continuation line. The backslash of a trailing [`LINE_CONTINUATION_MARKER`] is
    /// dropped and the space before it is kept.
    pub fn update_multi_line_buffer(&mut self) {
        let mut line = self.line_no_mask();
        if line.ends_with(LINE_CONTINUATION_MARKER) {
            line.pop();
        }
        self.multi_line_buffer.push_str(&line);
        self.multi_line = true;
        self.line.clear();
        self.cursor = 0;
        self.delta = 0;
    }

    #[must_use]
    pub fn is_multi_line(&self) -> bool { self.multi_line }

    #[must_use]
    pub fn multi_line_buffer(&self) -> &str { &self.multi_line_buffer }

    /// The logical value: accumulator followed by the live line.
    #[must_use]
    pub fn multi_line_content(&self) -> String {
        let mut acc = self.multi_line_buffer.clone();
        acc.push_str(&self.line_no_mask());
        acc
    }

    /// `true` if the live line asks for a continuation line.
    #[must_use]
    pub fn ends_with_continuation(&self) -> bool {
        self.line_no_mask().ends_with(LINE_CONTINUATION_MARKER)
    }

    /// The line as it is displayed: mask characters when masking, nothing at all with
    /// a zero mask.
    #[must_use]
    pub fn line(&self) -> String {
        if self.is_zero_masked() {
            return String::new();
        }
        match self.prompt.mask() {
            Some(mask) => std::iter::repeat_n(mask, self.line.len()).collect(),
            None => self.line_no_mask(),
        }
    }

    #[must_use]
    pub fn line_no_mask(&self) -> String { self.line.iter().collect() }

    /// Replace the content and move the cursor to its end.
    pub fn set_line(&mut self, text: &str) {
        let old_len = self.line.len();
        self.line = text.chars().collect();
        self.cursor = self.line.len();
        self.delta = isize::try_from(self.line.len()).unwrap_or(isize::MAX)
            - isize::try_from(old_len).unwrap_or(isize::MAX);
    }

    /// Toggle the case of the character under the cursor. Returns `false` if there is
    /// no character there or its case mapping is not a single character.
    pub fn change_case(&mut self) -> bool {
        let Some(&ch) = self.line.get(self.cursor) else {
            return false;
        };
        let mapped: String = if ch.is_lowercase() {
            ch.to_uppercase().collect()
        } else if ch.is_uppercase() {
            ch.to_lowercase().collect()
        } else {
            return false;
        };
        let mut mapped = mapped.chars();
        match (mapped.next(), mapped.next()) {
            (Some(toggled), None) => {
                self.line[self.cursor] = toggled;
                true
            }
            _ => false,
        }
    }

    /// Replace the character under the cursor. Returns `false` at end of line.
    pub fn replace_char(&mut self, replacement: char) -> bool {
        match self.line.get_mut(self.cursor) {
            Some(ch) => {
                *ch = replacement;
                true
            }
            None => false,
        }
    }

    /// `true` if the line contains an output redirection (`>`).
    #[must_use]
    pub fn contains_redirection(&self) -> bool { self.redirection_position().is_some() }

    #[must_use]
    pub fn redirection_position(&self) -> Option<usize> {
        self.line.iter().position(|&ch| ch == '>')
    }

    /// Hide the prompt while rendering, e.g. under a search overlay.
    pub fn disable_prompt(&mut self, disable: bool) { self.disable_prompt = disable; }

    #[must_use]
    pub fn is_prompt_disabled(&self) -> bool { self.disable_prompt }

    /// The prompt as it is displayed, with styling.
    #[must_use]
    pub fn rendered_prompt(&self) -> String {
        if self.disable_prompt {
            String::new()
        } else if self.multi_line {
            CONTINUATION_PROMPT.to_string()
        } else {
            self.prompt.render()
        }
    }

    /// Columns taken by the displayed prompt.
    #[must_use]
    pub fn prompt_width(&self) -> usize {
        if self.disable_prompt {
            0
        } else if self.multi_line {
            str_display_width(CONTINUATION_PROMPT)
        } else {
            self.prompt.display_width()
        }
    }

    /// Displayed prompt followed by the displayed line.
    #[must_use]
    pub fn line_with_prompt(&self) -> String {
        let mut acc = self.rendered_prompt();
        acc.push_str(&self.line());
        acc
    }

    /// Columns taken by the first `index` characters as they are displayed.
    #[must_use]
    pub fn displayed_width_to(&self, index: usize) -> usize {
        let index = index.min(self.line.len());
        if self.is_zero_masked() {
            return 0;
        }
        match self.prompt.mask() {
            Some(mask) => char_display_width(mask) * index,
            None => chars_display_width(&self.line[..index]),
        }
    }

    /// 1-based absolute column of the cursor, prompt included.
    #[must_use]
    pub fn cursor_with_prompt(&self) -> usize {
        self.prompt_width() + self.displayed_width_to(self.cursor()) + 1
    }

    /// 1-based absolute column just past the end of the displayed line.
    #[must_use]
    pub fn end_with_prompt(&self) -> usize {
        self.prompt_width() + self.displayed_width_to(self.line.len()) + 1
    }

    /// Clamp and apply a cursor move without producing output.
    pub fn move_cursor_silently(&mut self, delta: isize, vi_command: bool) {
        self.cursor = clamp_move(self.cursor, self.line.len(), delta, vi_command);
    }

    /// Put the cursor at `index`, clamped to the content.
    pub fn set_cursor(&mut self, index: usize) { self.cursor = index.min(self.line.len()); }

    /// Clamp and apply a cursor move, and return the escape sequence that moves the
    /// terminal cursor along with it. While zero masked the sequence is empty.
    pub fn move_cursor(&mut self, delta: isize, width: usize, vi_command: bool) -> String {
        let from = self.cursor_with_prompt();
        self.move_cursor_silently(delta, vi_command);
        tracing::debug!(
            message = "move cursor",
            delta,
            cursor = self.cursor,
            width,
            vi_command
        );
        if self.is_zero_masked() {
            return String::new();
        }
        reposition(from, self.cursor_with_prompt(), width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZERO_MASK;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_inserts_at_cursor() {
        let mut buffer = LineBuffer::new(Prompt::new("> "));
        buffer.write("held");
        assert_eq!(buffer.line(), "held");
        assert_eq!(buffer.cursor(), 4);
        assert_eq!(buffer.delta(), 4);

        buffer.move_cursor_silently(-2, false);
        buffer.write("lo wor");
        assert_eq!(buffer.line(), "helo world");
        assert_eq!(buffer.cursor(), 8);
        assert_eq!(buffer.delta(), 6);
    }

    #[test]
    fn test_write_then_delete_round_trip() {
        let mut buffer = LineBuffer::new(Prompt::new("> "));
        buffer.write("abcdef");
        buffer.set_cursor(2);

        let (before_line, before_cursor) = (buffer.line(), buffer.cursor());
        buffer.write("XYZ");
        buffer.delete(2, 5);
        assert_eq!(buffer.line(), before_line);
        assert_eq!(buffer.cursor(), before_cursor);
        assert_eq!(buffer.delta(), -3);
    }

    #[test]
    fn test_delete_clamps_range() {
        let mut buffer = LineBuffer::new(Prompt::empty());
        buffer.write("abc");
        buffer.delete(1, 10);
        assert_eq!(buffer.line(), "a");
        assert_eq!(buffer.cursor(), 1);
        assert_eq!(buffer.delta(), -2);
    }

    #[test]
    fn test_reset_and_update_prompt() {
        let mut buffer = LineBuffer::new(Prompt::new("a> "));
        buffer.update_prompt(Prompt::new("b> "));
        assert_eq!(buffer.prompt().text(), "b> ");

        buffer.write("typed");
        buffer.update_prompt(Prompt::new("c> "));
        assert_eq!(buffer.prompt().text(), "c> ");
        assert_eq!(buffer.line(), "typed");
        assert_eq!(buffer.cursor(), 5);

        buffer.reset(None);
        assert!(buffer.prompt().is_empty());
        assert_eq!(buffer.line(), "");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_multi_line_buffer() {
        let mut buffer = LineBuffer::new(Prompt::new("$ "));
        buffer.write("echo foo \\");
        assert!(buffer.ends_with_continuation());
        buffer.update_multi_line_buffer();
        assert!(buffer.is_multi_line());
        assert_eq!(buffer.multi_line_buffer(), "echo foo ");
        assert_eq!(buffer.rendered_prompt(), CONTINUATION_PROMPT);
        assert_eq!(buffer.cursor(), 0);

        buffer.write("bar");
        assert_eq!(buffer.multi_line_content(), "echo foo bar");
    }

    #[test]
    fn test_zero_mask_hides_length_and_cursor() {
        let mut buffer = LineBuffer::new(Prompt::new("password: ").with_mask(ZERO_MASK));
        let start = buffer.cursor_with_prompt();
        for step in 0..10 {
            if step % 3 == 2 {
                let at = buffer.real_cursor();
                buffer.move_cursor_silently(-1, false);
                buffer.delete(at.saturating_sub(1), at);
            } else {
                buffer.write("sec");
            }
            assert_eq!(buffer.length(), 1);
            assert_eq!(buffer.cursor(), 0);
            assert_eq!(buffer.line(), "");
            assert_eq!(buffer.cursor_with_prompt(), start);
        }
        assert_eq!(buffer.line_no_mask(), "secsesecsesecsesec");
        assert_eq!(buffer.move_cursor(-3, 80, false), "");
    }

    #[test]
    fn test_star_mask_shows_placeholders() {
        let mut buffer = LineBuffer::new(Prompt::new("pin: ").with_mask('*'));
        buffer.write("1234");
        assert_eq!(buffer.line(), "****");
        assert_eq!(buffer.length(), 4);
        assert_eq!(buffer.line_with_prompt(), "pin: ****");
    }

    #[test]
    fn test_cursor_with_prompt_counts_wide_glyphs() {
        let mut buffer = LineBuffer::new(Prompt::new("> "));
        buffer.write("a世b");
        assert_eq!(buffer.cursor_with_prompt(), 2 + 4 + 1);
        assert_eq!(buffer.move_cursor(-2, 80, false), "\x1b[3D");
    }

    #[test]
    fn test_move_clamps_in_vi_command_mode() {
        let mut buffer = LineBuffer::new(Prompt::empty());
        buffer.write("abc");
        buffer.move_cursor_silently(10, true);
        assert_eq!(buffer.cursor(), 2);
        buffer.move_cursor_silently(10, false);
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn test_move_across_wrapped_rows() {
        // Prompt "> " plus 12 characters on a 10 column terminal.
        let mut buffer = LineBuffer::new(Prompt::new("> "));
        buffer.write("abcdefghijkl");
        assert_eq!(buffer.cursor_with_prompt(), 15);
        assert_eq!(buffer.move_cursor(-12, 10, false), "\x1b[1A\x1b[3G");
        assert_eq!(buffer.move_cursor(7, 10, false), "\x1b[7C");
        assert_eq!(buffer.move_cursor(1, 10, false), "\x1b[1B\x1b[1G");
    }

    #[test]
    fn test_change_case_and_replace() {
        let mut buffer = LineBuffer::new(Prompt::empty());
        buffer.write("aB1");
        buffer.set_cursor(0);
        assert!(buffer.change_case());
        buffer.set_cursor(1);
        assert!(buffer.change_case());
        buffer.set_cursor(2);
        assert!(!buffer.change_case());
        assert!(buffer.replace_char('z'));
        buffer.set_cursor(3);
        assert!(!buffer.replace_char('q'));
        assert_eq!(buffer.line(), "Abz");
    }

    #[test]
    fn test_redirection() {
        let mut buffer = LineBuffer::new(Prompt::empty());
        buffer.write("ls -l");
        assert!(!buffer.contains_redirection());
        buffer.write(" > out.txt");
        assert_eq!(buffer.redirection_position(), Some(6));
    }

    #[test]
    fn test_disabled_prompt() {
        let mut buffer = LineBuffer::new(Prompt::new("> "));
        buffer.write("x");
        buffer.disable_prompt(true);
        assert_eq!(buffer.line_with_prompt(), "x");
        assert_eq!(buffer.cursor_with_prompt(), 2);
    }
}
