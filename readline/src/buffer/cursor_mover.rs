// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Pure cursor arithmetic for a line that wraps at the terminal width.
//!
//! Positions are 1-based absolute columns measured from the first column of the
//! prompt's row, so position `W + 1` is the first column of the second row. A cursor
//! at an exact multiple of the width is on the last column of its row (the terminal
//! has not wrapped yet), which is why [`row_of`] subtracts one in that case.

use crossterm::{Command,
                cursor::{MoveDown, MoveLeft, MoveRight, MoveToColumn, MoveUp}};
use std::cmp::Ordering;

/// Clamp a cursor move against the line bounds.
///
/// The cursor can never go left of `0`. It can sit one past the last character
/// (`length`) in emacs mode and in vi insert mode. In vi command mode (`vi_command`)
/// it stops on the last character (`length - 1`).
#[must_use]
pub fn clamp_move(cursor: usize, length: usize, delta: isize, vi_command: bool) -> usize {
    let max = if vi_command { length.saturating_sub(1) } else { length };
    cursor.saturating_add_signed(delta).min(max)
}

/// 0-based row of the 1-based absolute column `position`.
#[must_use]
pub fn row_of(position: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let row = position / width;
    if row > 0 && position.is_multiple_of(width) { row - 1 } else { row }
}

/// 1-based column within its row of the 1-based absolute column `position`.
#[must_use]
pub fn column_of(position: usize, width: usize) -> usize {
    if width == 0 {
        return position;
    }
    match position % width {
        0 => width,
        column => column,
    }
}

/// ANSI escape sequence that moves the terminal cursor from absolute column `from` to
/// absolute column `to`.
///
/// - Same row: a relative horizontal move, or nothing when the columns are equal.
/// - Different rows: a vertical move followed by an absolute column move.
#[must_use]
pub fn reposition(from: usize, to: usize, width: usize) -> String {
    let mut acc = String::new();
    if width == 0 {
        return acc;
    }

    let from_row = row_of(from, width);
    let to_row = row_of(to, width);
    let to_column = column_of(to, width);

    match to_row.cmp(&from_row) {
        Ordering::Greater => {
            push_command(&mut acc, MoveDown(to_u16(to_row - from_row)));
            push_command(&mut acc, MoveToColumn(to_u16(to_column - 1)));
        }
        Ordering::Less => {
            push_command(&mut acc, MoveUp(to_u16(from_row - to_row)));
            push_command(&mut acc, MoveToColumn(to_u16(to_column - 1)));
        }
        Ordering::Equal => match to.cmp(&from) {
            Ordering::Less => push_command(&mut acc, MoveLeft(to_u16(from - to))),
            Ordering::Greater => push_command(&mut acc, MoveRight(to_u16(to - from))),
            Ordering::Equal => {}
        },
    }

    acc
}

/// Escape sequence that moves the terminal cursor from absolute column `from` back to
/// the first column of the prompt's row.
#[must_use]
pub fn move_to_line_start(from: usize, width: usize) -> String {
    let mut acc = String::new();
    let rows = row_of(from, width);
    if rows > 0 {
        push_command(&mut acc, MoveUp(to_u16(rows)));
    }
    push_command(&mut acc, MoveToColumn(0));
    acc
}

/// Append the ANSI form of `command` to `acc`.
pub fn push_command(acc: &mut String, command: impl Command) {
    // Writing into a String never fails.
    _ = command.write_ansi(acc);
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }
