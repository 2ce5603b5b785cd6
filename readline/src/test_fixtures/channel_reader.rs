// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Read, Result},
          sync::mpsc::{Receiver, Sender, channel}};

/// A blocking [`Read`] fed through a channel, one chunk per send. Each read returns
/// bytes of at most one chunk, so chunk boundaries reach the reader as they were sent.
/// Dropping every [`Sender`] ends the stream.
#[derive(Debug)]
pub struct ChannelReader {
    receiver: Receiver<Vec<u8>>,
    current: Vec<u8>,
    offset: usize,
}

impl ChannelReader {
    #[must_use]
    pub fn pair() -> (Sender<Vec<u8>>, Self) {
        let (sender, receiver) = channel();
        let reader = Self {
            receiver,
            current: Vec::new(),
            offset: 0,
        };
        (sender, reader)
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        while self.offset >= self.current.len() {
            match self.receiver.recv() {
                Ok(chunk) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let remaining = &self.current[self.offset..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.offset += count;
        Ok(count)
    }
}
