// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ConnectionState, push_command};
use crossterm::{cursor::{Hide, MoveTo, Show},
                terminal::{Clear, ClearType}};
use std::{fmt::Debug, io, sync::Arc};
use strum_macros::Display;

/// Receives each decoded chunk of input.
pub type StdinHandler = Arc<dyn Fn(&[char]) + Send + Sync>;
/// Receives the out of band signals that are not resizes.
pub type SignalHandler = Arc<dyn Fn(Signal) + Send + Sync>;
/// Receives the new terminal size after a resize.
pub type SizeHandler = Arc<dyn Fn(Size) + Send + Sync>;
/// Runs once when the connection closes.
pub type CloseHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Signal {
    /// Interrupt, usually `Ctrl+C`.
    Int,
    /// Window size change.
    Winch,
}

/// Terminal dimensions in columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self { Self { cols, rows } }

    /// Width used for cursor arithmetic.
    #[must_use]
    pub fn width(&self) -> usize { usize::from(self.cols) }
}

impl Default for Size {
    fn default() -> Self { Self::new(80, 24) }
}

/// Named terminal capabilities that can be requested with [`Connection::put`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Capability {
    ClearScreen,
    CursorHome,
    ClearToEndOfScreen,
    ClearToEndOfLine,
    CursorInvisible,
    CursorVisible,
    CursorAddress { row: u16, col: u16 },
    Bell,
    /// Application keypad on and off. Accepted, but nothing is emitted.
    KeypadXmit,
    KeypadLocal,
    /// Any other capability, by its terminfo name.
    Named(String),
}

impl Capability {
    /// The ANSI sequence for this capability, or `None` if it is not supported.
    #[must_use]
    pub fn ansi_sequence(&self) -> Option<String> {
        let mut acc = String::new();
        match self {
            Capability::ClearScreen => {
                push_command(&mut acc, Clear(ClearType::All));
                push_command(&mut acc, MoveTo(0, 0));
            }
            Capability::CursorHome => push_command(&mut acc, MoveTo(0, 0)),
            Capability::ClearToEndOfScreen => {
                push_command(&mut acc, Clear(ClearType::FromCursorDown));
            }
            Capability::ClearToEndOfLine => {
                push_command(&mut acc, Clear(ClearType::UntilNewLine));
            }
            Capability::CursorInvisible => push_command(&mut acc, Hide),
            Capability::CursorVisible => push_command(&mut acc, Show),
            Capability::CursorAddress { row, col } => push_command(&mut acc, MoveTo(*col, *row)),
            Capability::Bell => acc.push('\u{07}'),
            Capability::KeypadXmit | Capability::KeypadLocal => {}
            Capability::Named(name) => return Self::from_terminfo_name(name)?.ansi_sequence(),
        }
        Some(acc)
    }

    /// Map a terminfo capability name to a known capability.
    #[must_use]
    pub fn from_terminfo_name(name: &str) -> Option<Capability> {
        match name {
            "clear" => Some(Capability::ClearScreen),
            "home" => Some(Capability::CursorHome),
            "ed" => Some(Capability::ClearToEndOfScreen),
            "el" => Some(Capability::ClearToEndOfLine),
            "civis" => Some(Capability::CursorInvisible),
            "cnorm" => Some(Capability::CursorVisible),
            "bel" => Some(Capability::Bell),
            "smkx" => Some(Capability::KeypadXmit),
            "rmkx" => Some(Capability::KeypadLocal),
            _ => None,
        }
    }
}

/// A byte channel to a terminal, with decoded input delivered to handlers.
///
/// Implemented by [`crate::TerminalConnection`] for real terminals (and arbitrary
/// byte streams) and by [`crate::test_fixtures::TestConnection`] for tests.
///
/// Handlers are called without any connection lock held, so they may call back into
/// the connection, e.g. to [`Connection::write`], replace a handler, or
/// [`Connection::close`].
pub trait Connection: Send + Sync + Debug {
    /// Flags, handlers, size and the suspend gate.
    fn state(&self) -> &ConnectionState;

    /// Run the read loop on the current thread until reading stops, the stream ends or
    /// the connection closes. `seed` is decoded before anything is read.
    fn open_blocking(&self, seed: Option<&[u8]>);

    /// Run the read loop on a background thread. The thread does not keep the process
    /// alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread can not be spawned.
    fn open_non_blocking(self: Arc<Self>) -> io::Result<()>;

    /// Write text to the terminal. A failed write closes the connection.
    fn write(&self, text: &str);

    fn write_codepoints(&self, codepoints: &[char]) {
        self.write(&codepoints.iter().collect::<String>());
    }

    /// Emit a capability. Returns `false`, without an error, for unsupported ones.
    fn put(&self, capability: &Capability) -> bool;

    /// Idempotent. Stops reading, releases a pending suspend gate, restores the
    /// terminal, and runs the close handler the first time only.
    fn close(&self);

    /// Ask the environment for the current size. Defaults to the last known size.
    fn query_size(&self) -> Size { self.state().size() }

    fn size(&self) -> Size { self.state().size() }

    fn is_closed(&self) -> bool { self.state().is_closed() }

    fn stop_reading(&self) { self.state().stop_reading(); }

    fn is_reading(&self) -> bool { self.state().is_reading() }

    /// Pause input delivery after the next successful read.
    fn suspend(&self) { self.state().gate().suspend(); }

    fn awake(&self) { self.state().gate().awake(); }

    fn suspended(&self) -> bool { self.state().gate().is_suspended() }

    fn stdin_handler(&self) -> Option<StdinHandler> { self.state().stdin_handler() }

    fn set_stdin_handler(&self, handler: Option<StdinHandler>) {
        self.state().set_stdin_handler(handler);
    }

    fn signal_handler(&self) -> Option<SignalHandler> { self.state().signal_handler() }

    fn set_signal_handler(&self, handler: Option<SignalHandler>) {
        self.state().set_signal_handler(handler);
    }

    fn size_handler(&self) -> Option<SizeHandler> { self.state().size_handler() }

    fn set_size_handler(&self, handler: Option<SizeHandler>) {
        self.state().set_size_handler(handler);
    }

    fn close_handler(&self) -> Option<CloseHandler> { self.state().close_handler() }

    fn set_close_handler(&self, handler: Option<CloseHandler>) {
        self.state().set_close_handler(handler);
    }

    /// Deliver a signal:
    /// - [`Signal::Winch`] refreshes the size and notifies the size handler.
    /// - Other signals go to the signal handler. With no signal handler an interrupt
    ///   closes the connection.
    fn raise_signal(&self, signal: Signal) {
        tracing::debug!(message = "signal", %signal);
        match signal {
            Signal::Winch => {
                let size = self.query_size();
                self.state().set_size(size);
                if let Some(handler) = self.size_handler() {
                    handler(size);
                }
            }
            Signal::Int => match self.signal_handler() {
                Some(handler) => handler(signal),
                None => self.close(),
            },
        }
    }
}
