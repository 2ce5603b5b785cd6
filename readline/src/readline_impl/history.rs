// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::HISTORY_SIZE_MAX;
use std::collections::VecDeque;

/// Submitted lines, newest first, with a browsing position for the history keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    current_position: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: VecDeque::default(),
            max_size: HISTORY_SIZE_MAX,
            current_position: Option::default(),
        }
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Record a submitted line and stop browsing.
    pub fn update(&mut self, line: &str) {
        self.current_position = None;

        // Skip a repeat of the newest entry, or an empty line.
        if line.is_empty() || self.entries.front().is_some_and(|front| front == line) {
            return;
        }
        self.entries.push_front(line.to_string());
        if self.entries.len() > self.max_size {
            self.entries.pop_back();
        }
    }

    /// One step back in time. Stays on the oldest entry once it is reached.
    pub fn older(&mut self) -> Option<&str> {
        if let Some(index) = &mut self.current_position {
            if *index + 1 < self.entries.len() {
                *index += 1;
            }
            Some(&self.entries[*index])
        } else if !self.entries.is_empty() {
            self.current_position = Some(0);
            Some(&self.entries[0])
        } else {
            None
        }
    }

    /// One step towards the present. Past the newest entry this yields the empty
    /// line and stops browsing.
    pub fn newer(&mut self) -> Option<&str> {
        let index = self.current_position.as_mut()?;
        if *index == 0 {
            self.current_position = None;
            return Some("");
        }
        *index -= 1;
        Some(&self.entries[*index])
    }

    #[must_use]
    pub fn is_browsing(&self) -> bool { self.current_position.is_some() }

    pub fn stop_browsing(&mut self) { self.current_position = None; }
}
