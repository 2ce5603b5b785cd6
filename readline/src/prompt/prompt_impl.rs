// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::str_display_width;
use crossterm::style::{ContentStyle, StyledContent};
use std::fmt::Write as _;

/// Mask value that hides input completely: nothing is echoed and the cursor does not
/// move while typing.
pub const ZERO_MASK: char = '\0';

/// One prompt character with its foreground, background and attributes (bold,
/// italic, underline, reverse, crossed out, dim).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledChar {
    pub ch: char,
    pub style: ContentStyle,
}

impl StyledChar {
    #[must_use]
    pub fn new(ch: char, style: ContentStyle) -> Self { Self { ch, style } }
}

/// The decoration in front of an edited line. Immutable once constructed; a session
/// swaps prompts with [`crate::LineBuffer::update_prompt`].
///
/// A prompt may mask what the user types:
/// - `Some(ZERO_MASK)` hides it entirely (see [`ZERO_MASK`]).
/// - `Some(ch)` echoes `ch` once per typed character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt {
    chars: Vec<StyledChar>,
    mask: Option<char>,
}

impl Prompt {
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Self {
        Self::from_segments([(text.as_ref(), ContentStyle::default())])
    }

    #[must_use]
    pub fn empty() -> Self { Self::default() }

    /// Build a prompt out of `(text, style)` runs.
    ///
    /// ```
    /// use crossterm::style::{ContentStyle, Stylize};
    /// use r3bl_readline::Prompt;
    ///
    /// let prompt = Prompt::from_segments([
    ///     ("[", ContentStyle::new().blue()),
    ///     ("shell", ContentStyle::new().red().bold()),
    ///     ("]$ ", ContentStyle::new().blue()),
    /// ]);
    /// assert_eq!(prompt.text(), "[shell]$ ");
    /// ```
    #[must_use]
    pub fn from_segments<S: AsRef<str>>(
        segments: impl IntoIterator<Item = (S, ContentStyle)>,
    ) -> Self {
        let chars = segments
            .into_iter()
            .flat_map(|(text, style)| {
                text.as_ref()
                    .chars()
                    .map(|ch| StyledChar::new(ch, style))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { chars, mask: None }
    }

    #[must_use]
    pub fn from_styled_chars(chars: Vec<StyledChar>) -> Self { Self { chars, mask: None } }

    #[must_use]
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    #[must_use]
    pub fn mask(&self) -> Option<char> { self.mask }

    #[must_use]
    pub fn is_masking(&self) -> bool { self.mask.is_some() }

    #[must_use]
    pub fn is_zero_masked(&self) -> bool { self.mask == Some(ZERO_MASK) }

    #[must_use]
    pub fn styled_chars(&self) -> &[StyledChar] { &self.chars }

    /// The prompt without styling.
    #[must_use]
    pub fn text(&self) -> String { self.chars.iter().map(|it| it.ch).collect() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.chars.is_empty() }

    /// Number of terminal columns the prompt occupies.
    #[must_use]
    pub fn display_width(&self) -> usize { str_display_width(&self.text()) }

    /// The prompt with ANSI styling. Consecutive characters that share a style are
    /// emitted as one styled run.
    #[must_use]
    pub fn render(&self) -> String {
        let mut acc = String::new();
        let mut run = String::new();
        let mut run_style: Option<ContentStyle> = None;

        for styled_char in &self.chars {
            if run_style.is_some_and(|style| style != styled_char.style) {
                flush_run(&mut acc, &mut run, run_style);
            }
            run_style = Some(styled_char.style);
            run.push(styled_char.ch);
        }
        flush_run(&mut acc, &mut run, run_style);

        acc
    }
}

fn flush_run(acc: &mut String, run: &mut String, style: Option<ContentStyle>) {
    if run.is_empty() {
        return;
    }
    match style {
        Some(style) if style != ContentStyle::default() => {
            // Writing into a String never fails.
            _ = write!(acc, "{}", StyledContent::new(style, run.as_str()));
        }
        _ => acc.push_str(run),
    }
    run.clear();
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self { Prompt::new(text) }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self { Prompt::new(text) }
}
