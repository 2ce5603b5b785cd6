// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CloseHandler, SignalHandler, Size, SizeHandler, StdMutex, StdinHandler,
            SuspendGate, lock};
use std::{fmt::{Debug, Formatter},
          sync::atomic::{AtomicBool, Ordering}};

/// The state every [`crate::Connection`] shares: reading and closed flags, the
/// suspend gate, the last known size, and the registered handlers.
///
/// Handlers are cloned out of their slot before they are called, so no lock is held
/// while user code runs.
#[derive(Default)]
pub struct ConnectionState {
    reading: AtomicBool,
    closed: AtomicBool,
    gate: SuspendGate,
    size: StdMutex<Size>,
    stdin_handler: StdMutex<Option<StdinHandler>>,
    signal_handler: StdMutex<Option<SignalHandler>>,
    size_handler: StdMutex<Option<SizeHandler>>,
    close_handler: StdMutex<Option<CloseHandler>>,
}

impl Debug for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionState")
            .field("reading", &self.is_reading())
            .field("closed", &self.is_closed())
            .field("suspended", &self.gate.is_suspended())
            .field("size", &self.size())
            .field("stdin_handler", &lock(&self.stdin_handler).is_some())
            .field("signal_handler", &lock(&self.signal_handler).is_some())
            .field("size_handler", &lock(&self.size_handler).is_some())
            .field("close_handler", &lock(&self.close_handler).is_some())
            .finish()
    }
}

impl ConnectionState {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size: StdMutex::new(size),
            ..Default::default()
        }
    }

    /// Returns `false` if a read loop is already running.
    pub fn start_reading(&self) -> bool { !self.reading.swap(true, Ordering::SeqCst) }

    pub fn stop_reading(&self) { self.reading.store(false, Ordering::SeqCst); }

    #[must_use]
    pub fn is_reading(&self) -> bool { self.reading.load(Ordering::SeqCst) }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }

    #[must_use]
    pub fn gate(&self) -> &SuspendGate { &self.gate }

    #[must_use]
    pub fn size(&self) -> Size { *lock(&self.size) }

    pub fn set_size(&self, size: Size) { *lock(&self.size) = size; }

    #[must_use]
    pub fn stdin_handler(&self) -> Option<StdinHandler> { lock(&self.stdin_handler).clone() }

    pub fn set_stdin_handler(&self, handler: Option<StdinHandler>) {
        *lock(&self.stdin_handler) = handler;
    }

    #[must_use]
    pub fn signal_handler(&self) -> Option<SignalHandler> {
        lock(&self.signal_handler).clone()
    }

    pub fn set_signal_handler(&self, handler: Option<SignalHandler>) {
        *lock(&self.signal_handler) = handler;
    }

    #[must_use]
    pub fn size_handler(&self) -> Option<SizeHandler> { lock(&self.size_handler).clone() }

    pub fn set_size_handler(&self, handler: Option<SizeHandler>) {
        *lock(&self.size_handler) = handler;
    }

    #[must_use]
    pub fn close_handler(&self) -> Option<CloseHandler> { lock(&self.close_handler).clone() }

    pub fn set_close_handler(&self, handler: Option<CloseHandler>) {
        *lock(&self.close_handler) = handler;
    }

    /// Hand decoded input to the stdin handler, if there is one.
    pub fn dispatch(&self, codepoints: &[char]) {
        if codepoints.is_empty() {
            return;
        }
        match self.stdin_handler() {
            Some(handler) => handler(codepoints),
            None => tracing::debug!(
                message = "input dropped, no stdin handler",
                len = codepoints.len()
            ),
        }
    }

    /// The shared close sequence. Only the first call does anything: it stops reading,
    /// opens the suspend gate, runs `restore`, then the close handler.
    pub fn close_with(&self, restore: impl FnOnce()) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(message = "connection closed");
        self.stop_reading();
        self.gate.awake();
        restore();
        if let Some(handler) = self.close_handler() {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, atomic::AtomicUsize};

    #[test]
    fn test_close_runs_close_handler_once() {
        let state = ConnectionState::new(Size::default());
        let count = Arc::new(AtomicUsize::new(0));
        let restored = Arc::new(AtomicUsize::new(0));
        state.set_close_handler(Some({
            let count = count.clone();
            Arc::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        }));
        assert!(state.start_reading());
        state.gate().suspend();

        for _ in 0..3 {
            let restored = restored.clone();
            state.close_with(move || {
                restored.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(restored.load(Ordering::SeqCst), 1);
        assert!(state.is_closed());
        assert!(!state.is_reading());
        assert!(!state.gate().is_suspended());
    }

    #[test]
    fn test_start_reading_twice() {
        let state = ConnectionState::default();
        assert!(state.start_reading());
        assert!(!state.start_reading());
        state.stop_reading();
        assert!(state.start_reading());
    }

    #[test]
    fn test_dispatch_calls_handler_without_holding_locks() {
        let state = Arc::new(ConnectionState::default());
        let seen = Arc::new(StdMutex::new(Vec::new()));
        state.set_stdin_handler(Some({
            let state = state.clone();
            let seen = seen.clone();
            Arc::new(move |codepoints: &[char]| {
                seen.lock().unwrap().extend_from_slice(codepoints);
                // Replacing the handler from inside the handler must not deadlock.
                state.set_stdin_handler(None);
            })
        }));
        state.dispatch(&['a', 'b']);
        state.dispatch(&['c']);
        assert_eq!(*seen.lock().unwrap(), vec!['a', 'b']);
    }
}
