// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod connection_api;
pub mod connection_state;
pub mod raw_mode;
pub mod suspend_gate;
pub mod terminal_connection;

// Re-export.
pub use connection_api::*;
pub use connection_state::*;
pub use raw_mode::*;
pub use suspend_gate::*;
pub use terminal_connection::*;
