// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{StdMutex, lock};
use std::sync::{Condvar, PoisonError};

/// Pauses a read loop between two reads. [`Self::suspend`] closes the gate,
/// [`Self::awake`] opens it and wakes the waiting loop.
#[derive(Debug, Default)]
pub struct SuspendGate {
    suspended: StdMutex<bool>,
    condvar: Condvar,
}

impl SuspendGate {
    pub fn suspend(&self) { *lock(&self.suspended) = true; }

    pub fn awake(&self) {
        *lock(&self.suspended) = false;
        self.condvar.notify_all();
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool { *lock(&self.suspended) }

    /// Block while the gate is closed.
    pub fn wait(&self) {
        let guard = lock(&self.suspended);
        drop(
            self.condvar
                .wait_while(guard, |suspended| *suspended)
                .unwrap_or_else(PoisonError::into_inner),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::{Arc,
                     atomic::{AtomicBool, Ordering}},
              thread,
              time::Duration};

    #[test]
    fn test_open_gate_does_not_block() {
        let gate = SuspendGate::default();
        gate.wait();
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_awake_releases_waiter() {
        let gate = Arc::new(SuspendGate::default());
        gate.suspend();
        assert!(gate.is_suspended());

        let released = Arc::new(AtomicBool::new(false));
        let waiter = {
            let gate = gate.clone();
            let released = released.clone();
            thread::spawn(move || {
                gate.wait();
                released.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!released.load(Ordering::SeqCst));
        gate.awake();
        waiter.join().unwrap();
        assert!(released.load(Ordering::SeqCst));
    }
}
