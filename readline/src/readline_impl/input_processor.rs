// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ActionStatus, CompletionOutcome, EditAction, EditMode, History, InsertPosition,
            KeyBindingTable, KeyMap, LineBuffer, Motion, Prompt, Resolution,
            SafeCompletion, complete_with, keys, move_to_line_start, push_command,
            reposition, row_of};
use crossterm::{cursor::MoveTo,
                terminal::{Clear, ClearType}};
use std::fmt::{Debug, Formatter};

/// What the line read should do after a chunk of input has been processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// More input is expected.
    Continue,
    /// The submit key finished the line. Multi-line content is joined.
    Submitted(String),
    /// End of input on an empty line.
    EndOfFile,
    /// The interrupt key was typed.
    Interrupted,
}

/// Result of [`InputProcessor::process`]: bytes to send to the terminal, what happens
/// next, and the codepoints that followed a final outcome in the same chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub output: String,
    pub outcome: Outcome,
    pub leftover: Vec<char>,
}

/// Turns decoded input into edits of one [`LineBuffer`], resolving key sequences with
/// the [`KeyBindingTable`] of the [`EditMode`]. It owns no connection: everything it
/// wants to show is returned as output.
pub struct InputProcessor {
    buffer: LineBuffer,
    bindings: KeyBindingTable,
    initial_key_map: KeyMap,
    key_map: KeyMap,
    completions: Vec<SafeCompletion>,
    history: History,
    yank_register: String,
    pending: Vec<char>,
    awaiting_replace_char: bool,
    redirection_detection: bool,
    width: usize,
}

impl Debug for InputProcessor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputProcessor")
            .field("buffer", &self.buffer)
            .field("key_map", &self.key_map)
            .field("completions", &self.completions.len())
            .field("pending", &self.pending)
            .field("awaiting_replace_char", &self.awaiting_replace_char)
            .field("redirection_detection", &self.redirection_detection)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl InputProcessor {
    #[must_use]
    pub fn new(edit_mode: &EditMode) -> Self {
        Self {
            buffer: LineBuffer::default(),
            bindings: edit_mode.bindings().clone(),
            initial_key_map: edit_mode.initial_key_map(),
            key_map: edit_mode.initial_key_map(),
            completions: Vec::new(),
            history: History::new(),
            yank_register: String::new(),
            pending: Vec::new(),
            awaiting_replace_char: false,
            redirection_detection: false,
            width: 80,
        }
    }

    /// Start a new line read and return the output that shows the prompt.
    pub fn begin(
        &mut self,
        prompt: Prompt,
        completions: Vec<SafeCompletion>,
        width: usize,
    ) -> String {
        self.buffer.reset(Some(prompt));
        self.completions = completions;
        self.width = width;
        self.key_map = self.initial_key_map;
        self.pending.clear();
        self.awaiting_replace_char = false;
        self.history.stop_browsing();
        self.buffer.rendered_prompt()
    }

    #[must_use]
    pub fn buffer(&self) -> &LineBuffer { &self.buffer }

    #[must_use]
    pub fn key_map(&self) -> KeyMap { self.key_map }

    #[must_use]
    pub fn history(&self) -> &History { &self.history }

    #[must_use]
    pub fn yank_register(&self) -> &str { &self.yank_register }

    #[must_use]
    pub fn width(&self) -> usize { self.width }

    #[must_use]
    pub fn is_redirection_detection_on(&self) -> bool { self.redirection_detection }

    /// Index of the first output redirection in the line, while detection is on.
    #[must_use]
    pub fn redirection_position(&self) -> Option<usize> {
        if self.redirection_detection {
            self.buffer.redirection_position()
        } else {
            None
        }
    }

    /// Feed a chunk of decoded input.
    ///
    /// A key sequence that is cut off at the end of the chunk is kept until the next
    /// call. Input after a final outcome is not processed and comes back as
    /// [`ProcessResult::leftover`].
    pub fn process(&mut self, input: &[char]) -> ProcessResult {
        self.pending.extend_from_slice(input);
        let mut output = String::new();

        while !self.pending.is_empty() {
            if self.awaiting_replace_char {
                self.awaiting_replace_char = false;
                let ch = self.pending.remove(0);
                if ch != keys::ESC {
                    self.replace_char(ch, &mut output);
                }
                continue;
            }

            match self.bindings.resolve(self.key_map, &self.pending) {
                Resolution::Incomplete => break,
                Resolution::Matched { len, action } => {
                    self.pending.drain(..len);
                    tracing::debug!(message = "action", %action, key_map = %self.key_map);
                    if let Some(outcome) = self.apply(action, &mut output) {
                        return self.finish(output, outcome);
                    }
                }
                Resolution::Unbound => {
                    let ch = self.pending[0];
                    if keys::is_submit_key(ch) {
                        self.pending.remove(0);
                        if let Some(outcome) = self.submit(&mut output) {
                            return self.finish(output, outcome);
                        }
                    } else if ch.is_control() || self.key_map.is_vi_command() {
                        self.pending.remove(0);
                    } else {
                        let count = self
                            .pending
                            .iter()
                            .take_while(|&&ch| {
                                !ch.is_control()
                                    && !self.bindings.starts_binding(self.key_map, ch)
                            })
                            .count()
                            .max(1);
                        let text: Vec<char> = self.pending.drain(..count).collect();
                        self.insert(&text, &mut output);
                    }
                }
            }
        }

        ProcessResult {
            output,
            outcome: Outcome::Continue,
            leftover: Vec::new(),
        }
    }

    /// Abandon the line after an interrupt: echo `^C`, start over on a fresh row with
    /// the same prompt.
    pub fn interrupt(&mut self) -> String {
        let mut output = self.move_to_end();
        output.push_str("^C\r\n");
        let prompt = self.buffer.prompt().clone();
        self.buffer.reset(Some(prompt));
        self.key_map = self.initial_key_map;
        self.pending.clear();
        self.awaiting_replace_char = false;
        self.history.stop_browsing();
        output.push_str(&self.buffer.rendered_prompt());
        output
    }

    /// The terminal is now `width` columns wide. Returns the output that redraws the
    /// line.
    pub fn resize(&mut self, width: usize) -> String {
        let from = self.buffer.cursor_with_prompt();
        self.width = width;
        self.repaint(from)
    }

    /// Swap the prompt mid-edit and redraw. Typed input is kept.
    pub fn update_prompt(&mut self, prompt: Prompt) -> String {
        let from = self.buffer.cursor_with_prompt();
        self.buffer.update_prompt(prompt);
        self.repaint(from)
    }

    /// Hide or show the prompt and redraw, for commands that draw over the line.
    pub fn disable_prompt(&mut self, disable: bool) -> String {
        let from = self.buffer.cursor_with_prompt();
        self.buffer.disable_prompt(disable);
        self.repaint(from)
    }

    fn finish(&mut self, output: String, outcome: Outcome) -> ProcessResult {
        ProcessResult {
            output,
            outcome,
            leftover: std::mem::take(&mut self.pending),
        }
    }

    fn vi_command(&self) -> bool { self.key_map.is_vi_command() }

    fn apply(&mut self, action: EditAction, output: &mut String) -> Option<Outcome> {
        self.buffer.clear_delta();
        match action {
            EditAction::Motion { motion, status } => match status {
                ActionStatus::Move => self.move_by_motion(motion, output),
                ActionStatus::Delete | ActionStatus::Change | ActionStatus::Yank => {
                    self.operate(motion, status, output);
                }
            },
            EditAction::DeletePrevChar => {
                let cursor = self.buffer.real_cursor();
                if cursor > 0 {
                    self.delete_range(cursor - 1, cursor, output);
                }
            }
            EditAction::DeleteChar => self.delete_char(output),
            EditAction::EndOfFile => {
                if self.buffer.is_empty() && self.buffer.multi_line_buffer().is_empty() {
                    return Some(Outcome::EndOfFile);
                }
                self.delete_char(output);
            }
            EditAction::ChangeCase => {
                // Characters without case are stepped over too.
                if self.buffer.real_cursor() < self.buffer.content_len() {
                    let from = self.buffer.cursor_with_prompt();
                    self.buffer.change_case();
                    self.buffer.move_cursor_silently(1, self.vi_command());
                    self.render_repaint(from, output);
                }
            }
            EditAction::ReplaceChar => {
                if self.buffer.real_cursor() < self.buffer.content_len() {
                    self.awaiting_replace_char = true;
                }
            }
            EditAction::Paste { after_cursor } => self.paste(after_cursor, output),
            EditAction::InsertMode(position) => self.enter_insert_mode(position, output),
            EditAction::CommandMode => {
                if self.key_map == KeyMap::ViInsert {
                    self.key_map = KeyMap::ViCommand;
                    self.move_cursor(-1, output);
                }
            }
            EditAction::Complete => self.complete(output),
            EditAction::ClearScreen => {
                push_command(output, Clear(ClearType::All));
                push_command(output, MoveTo(0, 0));
                self.draw_line(output);
            }
            EditAction::PreviousHistory => {
                if !self.buffer.is_masking()
                    && let Some(entry) = self.history.older().map(str::to_string)
                {
                    self.replace_line(&entry, output);
                }
            }
            EditAction::NextHistory => {
                if !self.buffer.is_masking()
                    && let Some(entry) = self.history.newer().map(str::to_string)
                {
                    self.replace_line(&entry, output);
                }
            }
            EditAction::Interrupt => return Some(Outcome::Interrupted),
            EditAction::ToggleRedirectionDetection => {
                self.redirection_detection = !self.redirection_detection;
            }
        }
        None
    }

    fn submit(&mut self, output: &mut String) -> Option<Outcome> {
        output.push_str(&self.move_to_end());
        output.push_str("\r\n");

        if !self.buffer.is_masking() && self.buffer.ends_with_continuation() {
            self.buffer.update_multi_line_buffer();
            output.push_str(&self.buffer.rendered_prompt());
            tracing::debug!(message = "continuation line");
            return None;
        }

        let line = self.buffer.multi_line_content();
        if !self.buffer.is_masking() {
            self.history.update(&line);
        }
        Some(Outcome::Submitted(line))
    }

    fn insert(&mut self, text: &[char], output: &mut String) {
        let at_end = self.buffer.real_cursor() == self.buffer.content_len();
        let from = self.buffer.cursor_with_prompt();
        self.buffer.write_chars(text);

        if self.buffer.is_zero_masked() {
            return;
        }
        if at_end {
            match self.buffer.prompt().mask() {
                Some(mask) => output.extend(std::iter::repeat_n(mask, text.len())),
                None => output.extend(text),
            }
            output.push_str(wrap_fix(self.buffer.end_with_prompt(), self.width));
        } else {
            output.push_str(&self.repaint(from));
        }
    }

    fn replace_char(&mut self, ch: char, output: &mut String) {
        let from = self.buffer.cursor_with_prompt();
        if self.buffer.replace_char(ch) {
            self.render_repaint(from, output);
        }
    }

    fn delete_char(&mut self, output: &mut String) {
        let cursor = self.buffer.real_cursor();
        if cursor < self.buffer.content_len() {
            self.delete_range(cursor, cursor + 1, output);
        }
    }

    fn delete_range(&mut self, start: usize, end: usize, output: &mut String) {
        let from = self.buffer.cursor_with_prompt();
        let trailing = end >= self.buffer.content_len();
        self.buffer.delete(start, end);
        self.buffer.move_cursor_silently(0, self.vi_command());
        if trailing && self.erase_tail(from, output) {
            return;
        }
        self.render_repaint(from, output);
    }

    /// Text was removed from the end of the line and the cursor sits at the new end.
    /// If that stays on the row the terminal cursor is on, stepping back and clearing
    /// to the end of the row is enough.
    fn erase_tail(&self, from: usize, output: &mut String) -> bool {
        if self.buffer.delta() >= 0
            || self.buffer.is_zero_masked()
            || self.buffer.real_cursor() != self.buffer.content_len()
        {
            return false;
        }
        let to = self.buffer.cursor_with_prompt();
        if row_of(from, self.width) != row_of(to, self.width) {
            return false;
        }
        output.push_str(&reposition(from, to, self.width));
        push_command(output, Clear(ClearType::UntilNewLine));
        true
    }

    fn move_by_motion(&mut self, motion: Motion, output: &mut String) {
        let chars = self.buffer.chars();
        let cursor = self.buffer.real_cursor();
        let target = if motion == Motion::ForwardWordEnd && self.vi_command() {
            // Vi `e` lands on the last character of the word.
            Motion::ForwardWordEnd
                .target(chars, cursor + 1)
                .saturating_sub(1)
                .max(cursor)
        } else {
            motion.target(chars, cursor)
        };
        self.move_cursor(signed_delta(cursor, target), output);
    }

    fn operate(&mut self, motion: Motion, status: ActionStatus, output: &mut String) {
        let (start, end) = motion.range(self.buffer.chars(), self.buffer.real_cursor());
        if start < end {
            self.yank_register = self.buffer.slice(start, end);
        }
        match status {
            ActionStatus::Yank => {
                let cursor = self.buffer.real_cursor();
                self.move_cursor(signed_delta(cursor, start), output);
            }
            ActionStatus::Change => {
                self.key_map = KeyMap::ViInsert;
                if start < end {
                    self.delete_range(start, end, output);
                }
            }
            ActionStatus::Delete => {
                if start < end {
                    self.delete_range(start, end, output);
                }
            }
            ActionStatus::Move => {}
        }
    }

    fn paste(&mut self, after_cursor: bool, output: &mut String) {
        if self.yank_register.is_empty() {
            return;
        }
        let from = self.buffer.cursor_with_prompt();
        if after_cursor && self.buffer.real_cursor() < self.buffer.content_len() {
            self.buffer.move_cursor_silently(1, false);
        }
        let text = self.yank_register.clone();
        self.buffer.write(&text);
        if self.vi_command() {
            self.buffer.move_cursor_silently(-1, true);
        }
        self.render_repaint(from, output);
    }

    fn enter_insert_mode(&mut self, position: InsertPosition, output: &mut String) {
        self.key_map = KeyMap::ViInsert;
        let cursor = self.buffer.real_cursor();
        let target = match position {
            InsertPosition::AtCursor => cursor,
            InsertPosition::AfterCursor => (cursor + 1).min(self.buffer.content_len()),
            InsertPosition::LineStart => 0,
            InsertPosition::LineEnd => self.buffer.content_len(),
        };
        self.move_cursor(signed_delta(cursor, target), output);
    }

    fn complete(&mut self, output: &mut String) {
        if self.completions.is_empty() || self.buffer.is_masking() {
            return;
        }
        let cursor = self.buffer.real_cursor();
        let prefix = self.buffer.slice(0, cursor);
        match complete_with(&self.completions, &prefix) {
            CompletionOutcome::NoCandidates => {}
            CompletionOutcome::Replace(text) => {
                if let Some(suffix) = text.strip_prefix(prefix.as_str()) {
                    let suffix: Vec<char> = suffix.chars().collect();
                    self.insert(&suffix, output);
                } else {
                    let from = self.buffer.cursor_with_prompt();
                    self.buffer.delete(0, cursor);
                    self.buffer.set_cursor(0);
                    self.buffer.write(&text);
                    self.render_repaint(from, output);
                }
            }
            CompletionOutcome::List(candidates) => {
                output.push_str(&self.move_to_end());
                output.push_str("\r\n");
                output.push_str(&candidates.join("  "));
                output.push_str("\r\n");
                self.draw_line(output);
            }
        }
    }

    fn replace_line(&mut self, text: &str, output: &mut String) {
        let from = self.buffer.cursor_with_prompt();
        self.buffer.set_line(text);
        self.render_repaint(from, output);
    }

    fn move_cursor(&mut self, delta: isize, output: &mut String) {
        let vi_command = self.vi_command();
        output.push_str(&self.buffer.move_cursor(delta, self.width, vi_command));
    }

    /// Output that puts the terminal cursor just past the end of the line.
    fn move_to_end(&self) -> String {
        if self.buffer.is_zero_masked() {
            return String::new();
        }
        reposition(
            self.buffer.cursor_with_prompt(),
            self.buffer.end_with_prompt(),
            self.width,
        )
    }

    fn render_repaint(&self, from: usize, output: &mut String) {
        if !self.buffer.is_zero_masked() {
            output.push_str(&self.repaint(from));
        }
    }

    /// Redraw the prompt and line, starting from the terminal cursor at `from`.
    fn repaint(&self, from: usize) -> String {
        let mut output = move_to_line_start(from, self.width);
        push_command(&mut output, Clear(ClearType::FromCursorDown));
        self.draw_line(&mut output);
        output
    }

    /// Draw prompt and line from the first column, then place the cursor.
    fn draw_line(&self, output: &mut String) {
        output.push_str(&self.buffer.line_with_prompt());
        let end = self.buffer.end_with_prompt();
        output.push_str(wrap_fix(end, self.width));
        if !self.buffer.is_zero_masked() {
            let cursor = self.buffer.cursor_with_prompt();
            output.push_str(&reposition(end, cursor, self.width));
        }
    }
}

/// After the last column of a row is written the terminal holds the cursor there
/// until the next character. Moving to the next row keeps the cursor arithmetic in
/// step with the terminal.
fn wrap_fix(end: usize, width: usize) -> &'static str {
    if width > 0 && end > 1 && (end - 1).is_multiple_of(width) {
        "\r\n"
    } else {
        ""
    }
}

fn signed_delta(from: usize, to: usize) -> isize {
    let from = isize::try_from(from).unwrap_or(isize::MAX);
    let to = isize::try_from(to).unwrap_or(isize::MAX);
    to - from
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WordListCompletion, ZERO_MASK};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn chars(text: &str) -> Vec<char> { text.chars().collect() }

    fn processor(edit_mode: &EditMode, prompt: &str) -> InputProcessor {
        let mut processor = InputProcessor::new(edit_mode);
        processor.begin(Prompt::new(prompt), Vec::new(), 80);
        processor
    }

    fn strip(output: &str) -> String {
        String::from_utf8_lossy(&strip_ansi_escapes::strip(output)).replace('\r', "")
    }

    #[test]
    fn test_submit() {
        let mut processor = processor(&EditMode::emacs(), "> ");
        let result = processor.process(&chars("foo"));
        assert_eq!(result.output, "foo");
        assert_eq!(result.outcome, Outcome::Continue);

        let result = processor.process(&chars("\rbar"));
        assert_eq!(result.output, "\r\n");
        assert_eq!(result.outcome, Outcome::Submitted("foo".to_string()));
        assert_eq!(result.leftover, chars("bar"));
        assert_eq!(processor.history().entries.front().map(String::as_str), Some("foo"));
    }

    #[test]
    fn test_empty_line_and_end_of_file() {
        let mut processor = processor(&EditMode::emacs(), "");
        assert_eq!(processor.process(&['\r']).outcome, Outcome::Submitted(String::new()));

        processor.begin(Prompt::new(""), Vec::new(), 80);
        assert_eq!(processor.process(&[keys::CTRL_D]).outcome, Outcome::EndOfFile);

        processor.begin(Prompt::new(""), Vec::new(), 80);
        assert_eq!(
            processor.process(&['a', 'b', keys::CTRL_A, keys::CTRL_D]).outcome,
            Outcome::Continue
        );
        assert_eq!(processor.buffer().line(), "b");
    }

    #[test]
    fn test_emacs_editing() {
        let mut processor = processor(&EditMode::emacs(), "");
        processor.process(&chars("hello world"));
        processor.process(&[keys::CTRL_W]);
        assert_eq!(processor.buffer().line(), "hello ");
        assert_eq!(processor.yank_register(), "world");

        processor.process(&[keys::CTRL_A]);
        processor.process(&[keys::CTRL_Y]);
        assert_eq!(processor.buffer().line(), "worldhello ");
        assert_eq!(processor.buffer().cursor(), 5);

        processor.process(&[keys::CTRL_K]);
        assert_eq!(processor.buffer().line(), "world");
        processor.process(keys::LEFT);
        processor.process(&[keys::BACKSPACE]);
        assert_eq!(processor.buffer().line(), "word");
        assert_eq!(processor.buffer().cursor(), 3);
    }

    #[test]
    fn test_escape_sequence_split_across_chunks() {
        let mut processor = processor(&EditMode::emacs(), "");
        processor.process(&chars("ab"));
        assert_eq!(processor.process(&[keys::ESC]).output, "");
        assert_eq!(processor.buffer().cursor(), 2);
        let result = processor.process(&['[', 'D']);
        assert_eq!(result.output, "\x1b[1D");
        assert_eq!(processor.buffer().cursor(), 1);
    }

    #[test]
    fn test_delete_at_end_only_erases_the_tail() {
        let mut processor = processor(&EditMode::emacs(), "$ ");
        processor.process(&chars("hello world"));

        let result = processor.process(&[keys::BACKSPACE]);
        assert_eq!(result.output, "\x1b[1D\x1b[K");
        assert_eq!(processor.buffer().line(), "hello worl");

        let result = processor.process(&[keys::CTRL_W]);
        assert_eq!(result.output, "\x1b[4D\x1b[K");
        assert_eq!(processor.buffer().line(), "hello ");
    }

    #[test]
    fn test_delete_in_the_middle_repaints() {
        let mut processor = processor(&EditMode::emacs(), "$ ");
        processor.process(&chars("abc"));
        processor.process(keys::LEFT);
        let result = processor.process(&[keys::BACKSPACE]);
        assert_eq!(strip(&result.output), "$ ac");
        assert!(result.output.contains("\x1b[J"));
    }

    #[test]
    fn test_delete_at_end_across_a_row_repaints() {
        let mut processor = InputProcessor::new(&EditMode::emacs());
        processor.begin(Prompt::new("$ "), Vec::new(), 10);
        processor.process(&chars("abcdefghij"));
        let result = processor.process(&[keys::CTRL_U]);
        assert_eq!(processor.buffer().line(), "");
        assert!(result.output.contains("\x1b[J"));
    }

    #[test]
    fn test_update_prompt_keeps_typed_input() {
        let mut processor = processor(&EditMode::emacs(), "a> ");
        processor.process(&chars("ab"));
        processor.process(keys::LEFT);
        let output = processor.update_prompt(Prompt::new("long> "));
        assert_eq!(strip(&output), "long> ab");
        assert!(output.ends_with("\x1b[1D"));
        assert_eq!(processor.buffer().cursor_with_prompt(), 8);

        let output = processor.disable_prompt(true);
        assert_eq!(strip(&output), "ab");
        assert_eq!(processor.buffer().cursor_with_prompt(), 2);
    }

    #[test]
    fn test_insert_in_the_middle_repaints() {
        let mut processor = processor(&EditMode::emacs(), "> ");
        processor.process(&chars("ac"));
        processor.process(keys::LEFT);
        let result = processor.process(&['b']);
        assert_eq!(strip(&result.output), "> abc");
        assert!(result.output.ends_with("\x1b[1D"));
    }

    #[test]
    fn test_multi_line_continuation() {
        let mut processor = processor(&EditMode::emacs(), "$ ");
        let result = processor.process(&chars("foo \\\r"));
        assert_eq!(result.outcome, Outcome::Continue);
        assert!(result.output.ends_with("\r\n> "));
        let result = processor.process(&chars("bar\r"));
        assert_eq!(result.outcome, Outcome::Submitted("foo bar".to_string()));
    }

    #[test]
    fn test_zero_mask_never_reaches_the_terminal() {
        let mut processor = InputProcessor::new(&EditMode::emacs());
        processor.begin(Prompt::new("password: ").with_mask(ZERO_MASK), Vec::new(), 80);
        let result = processor.process(&chars("secret"));
        assert_eq!(result.output, "");
        let result = processor.process(&[keys::BACKSPACE, keys::CTRL_A, keys::CTRL_E]);
        assert_eq!(result.output, "");
        let result = processor.process(&['\r']);
        assert_eq!(result.output, "\r\n");
        assert_eq!(result.outcome, Outcome::Submitted("secre".to_string()));
        assert!(processor.history().entries.is_empty());
    }

    #[test]
    fn test_mask_echoes_mask_char() {
        let mut processor = InputProcessor::new(&EditMode::emacs());
        processor.begin(Prompt::new("").with_mask('*'), Vec::new(), 80);
        assert_eq!(processor.process(&chars("abc")).output, "***");
    }

    #[test]
    fn test_history_navigation() {
        let mut processor = processor(&EditMode::emacs(), "");
        processor.process(&chars("one\r"));
        processor.begin(Prompt::new(""), Vec::new(), 80);
        processor.process(&chars("two\r"));
        processor.begin(Prompt::new(""), Vec::new(), 80);

        processor.process(keys::UP);
        assert_eq!(processor.buffer().line(), "two");
        processor.process(keys::UP);
        assert_eq!(processor.buffer().line(), "one");
        processor.process(keys::DOWN);
        processor.process(keys::DOWN);
        assert_eq!(processor.buffer().line(), "");
    }

    #[test]
    fn test_interrupt_key_and_reset() {
        let mut processor = processor(&EditMode::emacs(), "");
        let result = processor.process(&['F', 'O', 'O', keys::CTRL_C, 'x']);
        assert_eq!(result.outcome, Outcome::Interrupted);
        assert_eq!(result.leftover, vec!['x']);
        assert_eq!(strip(&processor.interrupt()), "^C\n");
        assert!(processor.buffer().is_empty());
    }

    #[test]
    fn test_completion() {
        let mut processor = InputProcessor::new(&EditMode::emacs());
        let words: SafeCompletion =
            Arc::new(WordListCompletion::new(["exit", "export", "quit"]));
        processor.begin(Prompt::new(""), vec![words], 80);

        processor.process(&['q', keys::TAB]);
        assert_eq!(processor.buffer().line(), "quit ");

        processor.process(&[keys::CTRL_U, 'e', keys::TAB]);
        assert_eq!(processor.buffer().line(), "ex");

        let result = processor.process(&[keys::TAB]);
        assert_eq!(processor.buffer().line(), "ex");
        assert_eq!(strip(&result.output), "\nexit  export\nex");
    }

    #[test]
    fn test_vi_command_mode() {
        let mut processor = processor(&EditMode::vi(), "");
        processor.process(&chars("foo bar baz"));
        processor.process(&[keys::ESC]);
        assert_eq!(processor.key_map(), KeyMap::ViCommand);
        assert_eq!(processor.buffer().cursor(), 10);

        processor.process(&['0', 'd', 'w']);
        assert_eq!(processor.buffer().line(), "bar baz");
        assert_eq!(processor.yank_register(), "foo ");

        processor.process(&['$', 'p']);
        assert_eq!(processor.buffer().line(), "bar bazfoo ");

        processor.process(&['0', 'c', 'w']);
        assert_eq!(processor.key_map(), KeyMap::ViInsert);
        processor.process(&chars("car"));
        assert_eq!(processor.buffer().line(), "car bazfoo ");

        processor.process(&[keys::ESC, '0', '~', 'x']);
        assert_eq!(processor.buffer().line(), "Cr bazfoo ");

        processor.process(&['r', 'X']);
        assert_eq!(processor.buffer().line(), "CX bazfoo ");

        processor.process(&['0', 'e']);
        assert_eq!(processor.buffer().cursor(), 1);

        processor.process(&['d', 'd']);
        assert!(processor.buffer().is_empty());

        // Printable keys that are not bound do nothing in command mode.
        processor.process(&['z']);
        assert!(processor.buffer().is_empty());
    }

    #[test]
    fn test_vi_cursor_stays_on_last_char() {
        let mut processor = processor(&EditMode::vi(), "");
        processor.process(&chars("ab"));
        processor.process(&[keys::ESC, '$', 'l', 'l']);
        assert_eq!(processor.buffer().cursor(), 1);
        processor.process(&['A']);
        assert_eq!(processor.buffer().cursor(), 2);
    }

    #[test]
    fn test_redirection_detection() {
        let mut processor = processor(&EditMode::emacs(), "");
        processor.process(&chars("ls > out"));
        assert_eq!(processor.redirection_position(), None);
        processor.process(&[keys::CTRL_X, 'r']);
        assert_eq!(processor.redirection_position(), Some(3));
    }

    #[test]
    fn test_wrap_fix_at_the_last_column() {
        let mut processor = InputProcessor::new(&EditMode::emacs());
        processor.begin(Prompt::new("> "), Vec::new(), 10);
        assert_eq!(processor.process(&chars("1234567")).output, "1234567");
        assert_eq!(processor.process(&['8']).output, "8\r\n");
        assert_eq!(processor.buffer().cursor_with_prompt(), 11);
    }
}
