// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Raw mode for the controlling terminal.
//!
//! Unlike `cfmakeraw`, signal generation and output post-processing stay on: `Ctrl+C`
//! still raises `SIGINT` (which the connection turns into [`crate::Signal::Int`]) and
//! `\n` written by applications still returns the carriage.

#[cfg(unix)]
pub use unix::*;

#[cfg(not(unix))]
pub use fallback::*;

#[cfg(unix)]
mod unix {
    use crate::ok;
    use miette::miette;
    use rustix::{fd::{AsFd, BorrowedFd},
                 termios::{self, LocalModes, OptionalActions, OutputModes, Termios}};
    use std::{fs::File,
              io,
              sync::{LazyLock, Mutex}};

    /// Settings from before the first [`enable_raw_mode`].
    static ORIGINAL_TERMIOS: LazyLock<Mutex<Option<Termios>>> =
        LazyLock::new(|| Mutex::new(None));

    enum TerminalFd {
        Stdin(io::Stdin),
        DevTty(File),
    }

    impl AsFd for TerminalFd {
        fn as_fd(&self) -> BorrowedFd<'_> {
            match self {
                TerminalFd::Stdin(stdin) => stdin.as_fd(),
                TerminalFd::DevTty(file) => file.as_fd(),
            }
        }
    }

    /// Stdin if it is a tty, `/dev/tty` otherwise.
    fn get_terminal_fd() -> io::Result<TerminalFd> {
        let stdin = io::stdin();
        if termios::isatty(&stdin) {
            Ok(TerminalFd::Stdin(stdin))
        } else {
            let file = File::options().read(true).write(true).open("/dev/tty")?;
            Ok(TerminalFd::DevTty(file))
        }
    }

    /// # Errors
    ///
    /// Returns an error if there is no controlling terminal or its attributes can not
    /// be read or written.
    pub fn enable_raw_mode() -> miette::Result<()> {
        let fd = get_terminal_fd()
            .map_err(|e| miette!("failed to get terminal file descriptor: {e}"))?;

        let mut termios = termios::tcgetattr(&fd)
            .map_err(|e| miette!("failed to retrieve terminal attributes: {e}"))?;

        {
            let mut original = ORIGINAL_TERMIOS
                .lock()
                .map_err(|e| miette!("terminal settings lock poisoned: {e}"))?;
            if original.is_none() {
                *original = Some(termios.clone());
            }
        }

        termios.make_raw();
        termios.local_modes.insert(LocalModes::ISIG);
        termios.output_modes.insert(OutputModes::OPOST);

        termios::tcsetattr(&fd, OptionalActions::Now, &termios)
            .map_err(|e| miette!("failed to set terminal attributes: {e}"))?;

        tracing::debug!(message = "raw mode enabled");
        ok!()
    }

    /// Restore the settings saved by [`enable_raw_mode`]. No-op if raw mode was never
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes can not be written.
    pub fn disable_raw_mode() -> miette::Result<()> {
        let original = ORIGINAL_TERMIOS
            .lock()
            .map_err(|e| miette!("terminal settings lock poisoned: {e}"))?;

        if let Some(ref termios) = *original {
            let fd = get_terminal_fd()
                .map_err(|e| miette!("failed to get terminal file descriptor: {e}"))?;
            termios::tcsetattr(&fd, OptionalActions::Now, termios)
                .map_err(|e| miette!("failed to set terminal attributes: {e}"))?;
            tracing::debug!(message = "raw mode disabled");
        }
        ok!()
    }
}

#[cfg(not(unix))]
mod fallback {
    use miette::IntoDiagnostic;

    /// # Errors
    ///
    /// Returns an error if the console mode can not be changed.
    pub fn enable_raw_mode() -> miette::Result<()> {
        crossterm::terminal::enable_raw_mode().into_diagnostic()
    }

    /// # Errors
    ///
    /// Returns an error if the console mode can not be changed.
    pub fn disable_raw_mode() -> miette::Result<()> {
        crossterm::terminal::disable_raw_mode().into_diagnostic()
    }
}
