// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Doubles for driving line reads in tests, without a terminal.

// Attach sources.
pub mod channel_reader;
pub mod stdout_mock;
pub mod test_connection;

// Re-export.
pub use channel_reader::*;
pub use stdout_mock::*;
pub use test_connection::*;
