// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_readline
//!
//! A callback driven line editor for terminals. It turns a raw, possibly fragmented
//! byte stream into edited lines, while rendering the prompt, the cursor, and the
//! line correctly across terminal resizes, multi-byte characters, wide glyphs,
//! password masking and multi-line continuation. Both Emacs and Vi style key bindings
//! are supported.
//!
//! # Data flow
//!
//! ```text
//! raw bytes ─▶ Decoder ─▶ [char] ─▶ Connection stdin handler ─▶ InputProcessor
//!     ─▶ KeyBindingTable ─▶ EditAction ─▶ LineBuffer ─▶ cursor_mover
//!     ─▶ Encoder ─▶ raw bytes ─▶ Connection output
//! ```
//!
//! Signals (interrupt, resize, close) arrive out of band on the [`Connection`] and are
//! delivered to whichever handler is currently registered.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use r3bl_readline::{Connection, EditMode, Prompt, Readline, ReadlineEvent,
//!                     TerminalConnection};
//!
//! fn main() -> miette::Result<()> {
//!     let connection = TerminalConnection::stdio()?;
//!     let readline = Readline::new(EditMode::default());
//!     read_next(readline, connection.clone());
//!     connection.open_blocking(None);
//!     Ok(())
//! }
//!
//! fn read_next(readline: Readline, connection: Arc<TerminalConnection>) {
//!     let next = readline.clone();
//!     let conn = connection.clone();
//!     let dyn_conn: Arc<dyn Connection> = connection;
//!     let result = readline.readline(&dyn_conn, Prompt::new("> "), move |event| {
//!         match event {
//!             ReadlineEvent::Line(line) if line == "exit" => conn.close(),
//!             ReadlineEvent::Line(line) => {
//!                 conn.write(&format!("{line}\n"));
//!                 read_next(next, conn);
//!             }
//!             _ => conn.close(),
//!         }
//!     });
//!     if result.is_err() {
//!         dyn_conn.close();
//!     }
//! }
//! ```

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod buffer;
pub mod cancel;
pub mod codec;
pub mod completion;
pub mod connection;
pub mod edit;
pub mod log;
pub mod prompt;
pub mod readline_impl;
pub mod test_fixtures;

// Re-export.
pub use buffer::*;
pub use cancel::*;
pub use codec::*;
pub use completion::*;
pub use connection::*;
pub use edit::*;
pub use log::*;
pub use prompt::*;
pub use readline_impl::*;

use std::sync::{MutexGuard, PoisonError};

/// Disambiguate the type of `StdMutex` from other mutex implementations.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Maximum number of submitted lines kept in [`History`].
pub const HISTORY_SIZE_MAX: usize = 1_000;

/// Prompt shown while collecting the continuation of a multi-line input.
pub const CONTINUATION_PROMPT: &str = "> ";

/// Marker at the end of a line that requests a continuation line.
pub const LINE_CONTINUATION_MARKER: &str = " \\";

/// Size of the byte buffer used by the read loop of a [`TerminalConnection`].
pub const READ_BUFFER_SIZE: usize = 1_024;

/// Shorthand for `Ok(())` or `Ok(value)`.
#[macro_export]
macro_rules! ok {
    () => {
        Ok(())
    };
    ($value:expr) => {
        Ok($value)
    };
}

/// Every mutation guarded by the crate's mutexes is completed before any user code
/// runs, so a poisoned lock still holds consistent state.
pub(crate) fn lock<T: ?Sized>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
