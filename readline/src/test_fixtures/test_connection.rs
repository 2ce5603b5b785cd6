// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Capability, Connection, ConnectionState, Decoder, Signal, Size, StdMutex, lock,
            test_fixtures::StdoutMock};
use std::{io::{self, Write},
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}}};

/// An in-memory [`Connection`]. Input is pushed with [`Self::read`] and handled on the
/// calling thread. Output is captured in a [`StdoutMock`].
#[derive(Debug)]
pub struct TestConnection {
    state: ConnectionState,
    stdout_mock: StdoutMock,
    decoder: StdMutex<Decoder>,
    capabilities: StdMutex<Vec<Capability>>,
    close_count: AtomicUsize,
}

impl Default for TestConnection {
    fn default() -> Self { Self::with_size(Size::new(80, 20)) }
}

impl TestConnection {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self {
            state: ConnectionState::new(size),
            stdout_mock: StdoutMock::default(),
            decoder: StdMutex::new(Decoder::new()),
            capabilities: StdMutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
        }
    }

    /// Deliver `text` to the stdin handler as one chunk.
    pub fn read(&self, text: &str) {
        let codepoints: Vec<char> = text.chars().collect();
        self.state.dispatch(&codepoints);
    }

    /// Deliver raw bytes, decoded with a decoder that keeps partial sequences between
    /// calls.
    pub fn read_bytes(&self, bytes: &[u8]) {
        let codepoints = lock(&self.decoder).decode(bytes);
        self.state.dispatch(&codepoints);
    }

    pub fn raise(&self, signal: Signal) { self.raise_signal(signal); }

    /// Change the size and report it, like a window resize.
    pub fn resize(&self, size: Size) {
        self.state.set_size(size);
        self.raise_signal(Signal::Winch);
    }

    /// Output with escape sequences and carriage returns removed.
    #[must_use]
    pub fn output(&self) -> String {
        self.stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .replace('\r', "")
    }

    #[must_use]
    pub fn raw_output(&self) -> String { self.stdout_mock.get_copy_of_buffer_as_string() }

    /// Capabilities requested with [`Connection::put`], in order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> { lock(&self.capabilities).clone() }

    /// How many times [`Connection::close`] actually closed.
    #[must_use]
    pub fn close_count(&self) -> usize { self.close_count.load(Ordering::SeqCst) }
}

impl Connection for TestConnection {
    fn state(&self) -> &ConnectionState { &self.state }

    /// Input is pushed with [`TestConnection::read`], so there is no loop to run.
    fn open_blocking(&self, seed: Option<&[u8]>) {
        if let Some(seed) = seed {
            self.read_bytes(seed);
        }
    }

    fn open_non_blocking(self: Arc<Self>) -> io::Result<()> { Ok(()) }

    fn write(&self, text: &str) {
        let mut stdout_mock = self.stdout_mock.clone();
        if let Err(error) = stdout_mock.write_all(text.as_bytes()) {
            tracing::warn!(message = "write failed", ?error);
        }
    }

    fn put(&self, capability: &Capability) -> bool {
        lock(&self.capabilities).push(capability.clone());
        false
    }

    fn close(&self) {
        self.state.close_with(|| {
            self.close_count.fetch_add(1, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_bytes_keeps_partial_sequences() {
        let connection = TestConnection::new();
        let seen = Arc::new(StdMutex::new(String::new()));
        connection.set_stdin_handler(Some({
            let seen = seen.clone();
            Arc::new(move |codepoints: &[char]| seen.lock().unwrap().extend(codepoints))
        }));
        let bytes = "€".as_bytes();
        connection.read_bytes(&bytes[..1]);
        connection.read_bytes(&bytes[1..]);
        assert_eq!(*seen.lock().unwrap(), "€");
    }

    #[test]
    fn test_interrupt_without_handler_closes() {
        let connection = TestConnection::new();
        connection.write("abc");
        connection.raise(Signal::Int);
        assert!(connection.is_closed());
        assert_eq!(connection.close_count(), 1);
        assert_eq!(connection.output(), "abc");
        connection.close();
        assert_eq!(connection.close_count(), 1);
    }

    #[test]
    fn test_put_records_capabilities() {
        let connection = TestConnection::new();
        assert!(!connection.put(&Capability::Bell));
        assert_eq!(connection.capabilities(), vec![Capability::Bell]);
    }
}
