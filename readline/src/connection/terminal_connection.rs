// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Capability, Connection, ConnectionState, Decoder, Encoder, READ_BUFFER_SIZE,
            Size, StdMutex, disable_raw_mode, enable_raw_mode, lock, ok};
use std::{fmt::{Debug, Formatter},
          io::{self, ErrorKind, Read, Write},
          sync::Arc,
          thread};

pub type SendRawTerminal = dyn Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// A [`Connection`] over any byte reader and writer. [`Self::stdio`] builds one for the
/// process's own terminal, with raw mode and signal forwarding.
pub struct TerminalConnection {
    state: ConnectionState,
    reader: StdMutex<Box<dyn Read + Send>>,
    writer: SafeRawTerminal,
    /// Set by [`Self::stdio`]: the size comes from the terminal and raw mode is
    /// restored on close.
    is_stdio: bool,
    #[cfg(unix)]
    signals: StdMutex<Option<signal_hook::iterator::Handle>>,
}

impl Debug for TerminalConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalConnection")
            .field("state", &self.state)
            .field("is_stdio", &self.is_stdio)
            .finish_non_exhaustive()
    }
}

impl TerminalConnection {
    /// A connection over arbitrary streams, with a fixed initial `size`. Nothing is
    /// done to the terminal and no signals are forwarded.
    #[must_use]
    pub fn new(reader: Box<dyn Read + Send>, writer: SafeRawTerminal, size: Size) -> Self {
        Self {
            state: ConnectionState::new(size),
            reader: StdMutex::new(reader),
            writer,
            is_stdio: false,
            #[cfg(unix)]
            signals: StdMutex::new(None),
        }
    }

    /// A connection to the process's terminal. Puts the terminal in raw mode and
    /// forwards `SIGINT` and `SIGWINCH` to [`Connection::raise_signal`].
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode can not be enabled or the signal listener can not
    /// be installed.
    pub fn stdio() -> miette::Result<Arc<Self>> {
        enable_raw_mode()?;
        let writer: SafeRawTerminal = Arc::new(StdMutex::new(io::stdout()));
        let connection = Arc::new(Self {
            is_stdio: true,
            ..Self::new(Box::new(io::stdin()), writer, terminal_size())
        });
        #[cfg(unix)]
        if let Err(error) = connection.listen_for_signals() {
            connection.close();
            return Err(error);
        }
        ok!(connection)
    }

    #[cfg(unix)]
    fn listen_for_signals(self: &Arc<Self>) -> miette::Result<()> {
        use miette::IntoDiagnostic;
        use signal_hook::{consts::{SIGINT, SIGWINCH},
                          iterator::Signals};

        let mut signals = Signals::new([SIGINT, SIGWINCH]).into_diagnostic()?;
        *lock(&self.signals) = Some(signals.handle());

        let weak = Arc::downgrade(self);
        thread::Builder::new()
            .name("signal-listener".to_string())
            .spawn(move || {
                for raw in signals.forever() {
                    let Some(connection) = weak.upgrade() else {
                        break;
                    };
                    match raw {
                        SIGINT => connection.raise_signal(crate::Signal::Int),
                        SIGWINCH => connection.raise_signal(crate::Signal::Winch),
                        _ => {}
                    }
                }
            })
            .into_diagnostic()?;
        ok!()
    }

    fn restore(&self) {
        #[cfg(unix)]
        if let Some(handle) = lock(&self.signals).take() {
            handle.close();
        }
        if !self.is_stdio {
            return;
        }
        if let Err(error) = disable_raw_mode() {
            tracing::warn!(message = "failed to restore terminal", ?error);
        }
    }

    fn read_loop(&self, seed: Option<&[u8]>) {
        let mut decoder = Decoder::new();
        if let Some(seed) = seed {
            self.state.dispatch(&decoder.decode(seed));
        }

        let mut buffer = [0_u8; READ_BUFFER_SIZE];
        let mut reader = lock(&self.reader);
        loop {
            if !self.state.is_reading() || self.state.is_closed() {
                return;
            }
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => {
                    self.state.dispatch(&decoder.decode(&buffer[..count]));
                    self.state.gate().wait();
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => {
                    tracing::warn!(message = "read failed", ?error);
                    break;
                }
            }
        }

        if let Some(ch) = decoder.finish() {
            self.state.dispatch(&[ch]);
        }
        drop(reader);
        self.close();
    }

    /// A failed write is fatal: the connection closes.
    fn write_bytes(&self, bytes: &[u8]) {
        let result = {
            let mut writer = lock(&self.writer);
            writer.write_all(bytes).and_then(|()| writer.flush())
        };
        if let Err(error) = result {
            tracing::warn!(message = "write failed, closing connection", ?error);
            self.close();
        }
    }
}

fn terminal_size() -> Size {
    crossterm::terminal::size()
        .map_or_else(|_| Size::default(), |(cols, rows)| Size::new(cols, rows))
}

impl Connection for TerminalConnection {
    fn state(&self) -> &ConnectionState { &self.state }

    fn open_blocking(&self, seed: Option<&[u8]>) {
        if self.state.is_closed() || !self.state.start_reading() {
            tracing::debug!(message = "read loop already running or connection closed");
            return;
        }
        self.read_loop(seed);
    }

    fn open_non_blocking(self: Arc<Self>) -> io::Result<()> {
        if self.state.is_closed() || !self.state.start_reading() {
            return ok!();
        }
        thread::Builder::new()
            .name("connection-reader".to_string())
            .spawn(move || self.read_loop(None))?;
        ok!()
    }

    fn write(&self, text: &str) { self.write_bytes(text.as_bytes()); }

    fn write_codepoints(&self, codepoints: &[char]) {
        self.write_bytes(&Encoder.encode(codepoints));
    }

    fn put(&self, capability: &Capability) -> bool {
        match capability.ansi_sequence() {
            Some(sequence) => {
                self.write(&sequence);
                true
            }
            None => {
                tracing::debug!(message = "unsupported capability", %capability);
                false
            }
        }
    }

    fn close(&self) { self.state.close_with(|| self.restore()); }

    fn query_size(&self) -> Size {
        if self.is_stdio { terminal_size() } else { self.state.size() }
    }
}
