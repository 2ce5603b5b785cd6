// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CloseHandler, Connection, EditMode, History, InputProcessor, Outcome, Prompt,
            SafeCompletion, Signal, SignalHandler, Size, SizeHandler, StdMutex,
            StdinHandler, lock, ok};
use std::{fmt::{Debug, Formatter},
          sync::{Arc, Weak}};

/// What a line read delivers to its callback, exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadlineEvent {
    /// The submit key finished a line. It may be empty.
    Line(String),
    /// The input ended, by the end-of-file key on an empty line or because the
    /// connection closed.
    Eof,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadlineError {
    #[error("a line is already being read")]
    AlreadyReading,

    #[error("the connection is closed")]
    Closed,
}

pub type ReadlineCallback = Box<dyn FnOnce(ReadlineEvent) + Send>;

/// The handlers that were registered on the connection when a line read started. This
/// is the frame that a nested line read pushes and pops.
#[derive(Clone, Default)]
struct SavedHandlers {
    stdin: Option<StdinHandler>,
    signal: Option<SignalHandler>,
    size: Option<SizeHandler>,
    close: Option<CloseHandler>,
}

impl SavedHandlers {
    fn of(connection: &dyn Connection) -> Self {
        Self {
            stdin: connection.stdin_handler(),
            signal: connection.signal_handler(),
            size: connection.size_handler(),
            close: connection.close_handler(),
        }
    }

    fn restore(self, connection: &dyn Connection) {
        connection.set_stdin_handler(self.stdin);
        connection.set_signal_handler(self.signal);
        connection.set_size_handler(self.size);
        connection.set_close_handler(self.close);
    }
}

struct Session {
    callback: ReadlineCallback,
    saved: SavedHandlers,
    connection: Weak<dyn Connection>,
}

struct ReadlineInner {
    processor: StdMutex<InputProcessor>,
    session: StdMutex<Option<Session>>,
}

/// Reads lines from a [`Connection`], one at a time, each delivered to a callback.
///
/// [`Self::readline`] installs handlers on the connection and returns right away. The
/// callback fires later, on the thread that drives the connection's read loop. From
/// inside the callback it is fine to start the next read, on this `Readline` or any
/// other, which is how a command asks for a sub-prompt:
///
/// ```
/// use std::sync::Arc;
/// use r3bl_readline::{Connection, EditMode, Prompt, Readline, ReadlineEvent,
///                     test_fixtures::TestConnection};
///
/// let connection = Arc::new(TestConnection::new());
/// let dyn_conn: Arc<dyn Connection> = connection.clone();
/// let readline = Readline::new(EditMode::default());
///
/// let nested = readline.clone();
/// let conn = dyn_conn.clone();
/// readline
///     .readline(&dyn_conn, Prompt::new("> "), move |event| {
///         assert_eq!(event, ReadlineEvent::Line("man".to_string()));
///         nested
///             .readline(&conn, Prompt::new("write something: "), |event| {
///                 assert_eq!(event, ReadlineEvent::Line("hello".to_string()));
///             })
///             .unwrap();
///     })
///     .unwrap();
///
/// connection.read("man\rhello\r");
/// assert!(!readline.is_reading());
/// ```
///
/// Each read keeps its own mask on its [`Prompt`], so a masked password read never
/// affects other sessions.
#[derive(Clone)]
pub struct Readline {
    inner: Arc<ReadlineInner>,
}

impl Debug for Readline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readline")
            .field("processor", &*lock(&self.inner.processor))
            .field("is_reading", &self.is_reading())
            .finish()
    }
}

impl Readline {
    #[must_use]
    pub fn new(edit_mode: EditMode) -> Self {
        Self {
            inner: Arc::new(ReadlineInner {
                processor: StdMutex::new(InputProcessor::new(&edit_mode)),
                session: StdMutex::new(None),
            }),
        }
    }

    /// `true` between [`Self::readline`] and its callback.
    #[must_use]
    pub fn is_reading(&self) -> bool { lock(&self.inner.session).is_some() }

    #[must_use]
    pub fn history(&self) -> History { lock(&self.inner.processor).history().clone() }

    /// Index of the first output redirection in the line being read, while redirection
    /// detection is toggled on.
    #[must_use]
    pub fn redirection_position(&self) -> Option<usize> {
        lock(&self.inner.processor).redirection_position()
    }

    /// Swap the prompt of the line being read and redraw it, keeping what has been
    /// typed. Returns `false` if no line is being read.
    pub fn update_prompt(&self, connection: &dyn Connection, prompt: Prompt) -> bool {
        if !self.is_reading() {
            return false;
        }
        let output = lock(&self.inner.processor).update_prompt(prompt);
        connection.write(&output);
        true
    }

    /// Hide or show the prompt of the line being read. Returns `false` if no line is
    /// being read.
    pub fn hide_prompt(&self, connection: &dyn Connection, hidden: bool) -> bool {
        if !self.is_reading() {
            return false;
        }
        let output = lock(&self.inner.processor).disable_prompt(hidden);
        connection.write(&output);
        true
    }

    /// Read one line without completion. See [`Self::readline_with_completions`].
    ///
    /// # Errors
    ///
    /// See [`Self::readline_with_completions`].
    pub fn readline(
        &self,
        connection: &Arc<dyn Connection>,
        prompt: Prompt,
        callback: impl FnOnce(ReadlineEvent) + Send + 'static,
    ) -> Result<(), ReadlineError> {
        self.readline_with_completions(connection, prompt, Vec::new(), callback)
    }

    /// Show `prompt` and start reading a line from `connection`. The registered
    /// handlers are saved, and put back right before `callback` runs:
    /// - The stdin handler feeds input to the line editor.
    /// - If no signal handler is registered, an interrupt abandons the line being
    ///   edited and shows the prompt again.
    /// - A resize redraws the line, then runs the saved size handler.
    /// - A close delivers [`ReadlineEvent::Eof`], then runs the saved close handler.
    ///
    /// Input typed ahead after the submit key is handed to whatever stdin handler is
    /// registered once `callback` returns.
    ///
    /// # Errors
    ///
    /// - [`ReadlineError::Closed`] if the connection is closed.
    /// - [`ReadlineError::AlreadyReading`] if this `Readline` has not delivered the
    ///   previous line yet.
    pub fn readline_with_completions(
        &self,
        connection: &Arc<dyn Connection>,
        prompt: Prompt,
        completions: Vec<SafeCompletion>,
        callback: impl FnOnce(ReadlineEvent) + Send + 'static,
    ) -> Result<(), ReadlineError> {
        if connection.is_closed() {
            return Err(ReadlineError::Closed);
        }

        let saved = {
            let mut session = lock(&self.inner.session);
            if session.is_some() {
                return Err(ReadlineError::AlreadyReading);
            }
            let saved = SavedHandlers::of(connection.as_ref());
            *session = Some(Session {
                callback: Box::new(callback),
                saved: saved.clone(),
                connection: Arc::downgrade(connection),
            });
            saved
        };

        let width = connection.size().width();
        let output = lock(&self.inner.processor).begin(prompt, completions, width);

        // Installed before the prompt is shown, so a failed write that closes the
        // connection still ends this read.
        self.install_handlers(connection, saved);
        tracing::debug!(message = "line read started");
        if !output.is_empty() {
            connection.write(&output);
        }
        ok!()
    }

    /// The installed handlers own the inner state, so a pending read completes even if
    /// every `Readline` handle is dropped. [`ReadlineInner::finish`] puts the saved
    /// handlers back, which releases them.
    fn install_handlers(&self, connection: &Arc<dyn Connection>, saved: SavedHandlers) {
        let weak_conn = Arc::downgrade(connection);

        connection.set_stdin_handler(Some(Arc::new({
            let inner = self.inner.clone();
            let weak_conn = weak_conn.clone();
            move |input: &[char]| {
                if let Some(connection) = weak_conn.upgrade() {
                    inner.on_input(&connection, input);
                }
            }
        })));

        if saved.signal.is_none() {
            connection.set_signal_handler(Some(Arc::new({
                let inner = self.inner.clone();
                let weak_conn = weak_conn.clone();
                move |signal: Signal| {
                    if signal != Signal::Int {
                        return;
                    }
                    if let Some(connection) = weak_conn.upgrade() {
                        inner.on_interrupt(&connection);
                    }
                }
            })));
        }

        connection.set_size_handler(Some(Arc::new({
            let inner = self.inner.clone();
            let previous = saved.size;
            move |size: Size| {
                if let Some(connection) = weak_conn.upgrade() {
                    inner.on_resize(&connection, size);
                }
                if let Some(previous) = &previous {
                    previous(size);
                }
            }
        })));

        connection.set_close_handler(Some(Arc::new({
            let inner = self.inner.clone();
            let previous = saved.close;
            move || {
                inner.finish(ReadlineEvent::Eof, Vec::new());
                if let Some(previous) = &previous {
                    previous();
                }
            }
        })));
    }
}

impl ReadlineInner {
    fn is_reading(&self) -> bool { lock(&self.session).is_some() }

    fn on_input(&self, connection: &Arc<dyn Connection>, input: &[char]) {
        let mut input = input.to_vec();
        while self.is_reading() {
            let result = lock(&self.processor).process(&input);
            if !result.output.is_empty() {
                connection.write(&result.output);
            }
            match result.outcome {
                Outcome::Continue => return,
                Outcome::Submitted(line) => {
                    return self.finish(ReadlineEvent::Line(line), result.leftover);
                }
                Outcome::EndOfFile => {
                    return self.finish(ReadlineEvent::Eof, result.leftover);
                }
                Outcome::Interrupted => {
                    connection.raise_signal(Signal::Int);
                    if result.leftover.is_empty() {
                        return;
                    }
                    if !self.is_reading() {
                        return forward(connection.as_ref(), &result.leftover);
                    }
                    input = result.leftover;
                }
            }
        }
    }

    fn on_interrupt(&self, connection: &Arc<dyn Connection>) {
        if !self.is_reading() {
            return;
        }
        let output = lock(&self.processor).interrupt();
        connection.write(&output);
    }

    fn on_resize(&self, connection: &Arc<dyn Connection>, size: Size) {
        if !self.is_reading() {
            return;
        }
        tracing::debug!(message = "resize", cols = size.cols, rows = size.rows);
        let output = lock(&self.processor).resize(size.width());
        connection.write(&output);
    }

    /// Pop the session: put the saved handlers back, run the callback, then hand any
    /// leftover input to the stdin handler registered by then.
    fn finish(&self, event: ReadlineEvent, leftover: Vec<char>) {
        let Some(session) = lock(&self.session).take() else {
            return;
        };
        let Session {
            callback,
            saved,
            connection,
        } = session;

        let connection = connection.upgrade();
        if let Some(connection) = &connection {
            saved.restore(connection.as_ref());
        }

        tracing::debug!(
            message = "line read finished",
            eof = matches!(event, ReadlineEvent::Eof),
            leftover = leftover.len()
        );
        callback(event);

        if let Some(connection) = connection {
            forward(connection.as_ref(), &leftover);
        }
    }
}

fn forward(connection: &dyn Connection, leftover: &[char]) {
    if leftover.is_empty() {
        return;
    }
    if let Some(handler) = connection.stdin_handler() {
        handler(leftover);
    }
}
