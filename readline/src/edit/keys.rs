// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Codepoints and escape sequences sent by terminals for the keys that the default
//! key binding tables use.

pub const CTRL_A: char = '\u{01}';
pub const CTRL_B: char = '\u{02}';
pub const CTRL_C: char = '\u{03}';
pub const CTRL_D: char = '\u{04}';
pub const CTRL_E: char = '\u{05}';
pub const CTRL_F: char = '\u{06}';
pub const CTRL_H: char = '\u{08}';
pub const TAB: char = '\t';
pub const LINE_FEED: char = '\n';
pub const CTRL_K: char = '\u{0b}';
pub const CTRL_L: char = '\u{0c}';
pub const CARRIAGE_RETURN: char = '\r';
pub const CTRL_N: char = '\u{0e}';
pub const CTRL_P: char = '\u{10}';
pub const CTRL_U: char = '\u{15}';
pub const CTRL_W: char = '\u{17}';
pub const CTRL_X: char = '\u{18}';
pub const CTRL_Y: char = '\u{19}';
pub const ESC: char = '\u{1b}';
pub const BACKSPACE: char = '\u{7f}';

pub const UP: &[char] = &[ESC, '[', 'A'];
pub const DOWN: &[char] = &[ESC, '[', 'B'];
pub const RIGHT: &[char] = &[ESC, '[', 'C'];
pub const LEFT: &[char] = &[ESC, '[', 'D'];
/// Arrow keys in application cursor mode.
pub const UP_APP: &[char] = &[ESC, 'O', 'A'];
pub const DOWN_APP: &[char] = &[ESC, 'O', 'B'];
pub const RIGHT_APP: &[char] = &[ESC, 'O', 'C'];
pub const LEFT_APP: &[char] = &[ESC, 'O', 'D'];
pub const CTRL_RIGHT: &[char] = &[ESC, '[', '1', ';', '5', 'C'];
pub const CTRL_LEFT: &[char] = &[ESC, '[', '1', ';', '5', 'D'];
pub const HOME: &[&[char]] = &[&[ESC, '[', 'H'], &[ESC, 'O', 'H'], &[ESC, '[', '1', '~']];
pub const END: &[&[char]] = &[&[ESC, '[', 'F'], &[ESC, 'O', 'F'], &[ESC, '[', '4', '~']];
pub const DELETE: &[char] = &[ESC, '[', '3', '~'];
pub const ALT_B: &[char] = &[ESC, 'b'];
pub const ALT_D: &[char] = &[ESC, 'd'];
pub const ALT_F: &[char] = &[ESC, 'f'];
pub const ALT_BACKSPACE: &[char] = &[ESC, BACKSPACE];

/// `true` for the keys that submit the line.
#[must_use]
pub fn is_submit_key(ch: char) -> bool { matches!(ch, CARRIAGE_RETURN | LINE_FEED) }
