// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cancellation for long running work started from a line callback, e.g. a command
//! that sleeps until `Ctrl+C`. The work waits on a [`CancellationToken`], and the
//! signal handler cancels it from any thread.

use crate::{StdMutex, lock};
use std::{sync::{Arc, Condvar, PoisonError},
          time::{Duration, Instant}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Completed,
    Cancelled,
}

/// Cloning shares the token. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(StdMutex<bool>, Condvar)>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Cancel and wake every waiter.
    pub fn cancel(&self) {
        let (cancelled, condvar) = &*self.inner;
        *lock(cancelled) = true;
        condvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool { *lock(&self.inner.0) }

    /// Wait for `duration`, or less if the token is cancelled first.
    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        let (cancelled, condvar) = &*self.inner;
        let deadline = Instant::now() + duration;
        let mut guard = lock(cancelled);
        while !*guard {
            let now = Instant::now();
            if now >= deadline {
                return SleepOutcome::Completed;
            }
            guard = condvar
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        SleepOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sleep_completes() {
        let token = CancellationToken::new();
        assert_eq!(token.sleep(Duration::from_millis(10)), SleepOutcome::Completed);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_wakes_sleeper() {
        let token = CancellationToken::new();
        let sleeper = {
            let token = token.clone();
            thread::spawn(move || {
                let start = Instant::now();
                (token.sleep(Duration::from_secs(30)), start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(50));
        token.cancel();
        let (outcome, elapsed) = sleeper.join().unwrap();
        assert_eq!(outcome, SleepOutcome::Cancelled);
        assert!(elapsed < Duration::from_secs(10));
    }

    #[test]
    fn test_cancelled_token_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(token.sleep(Duration::from_secs(30)), SleepOutcome::Cancelled);
    }
}
