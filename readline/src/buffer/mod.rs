// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod cursor_mover;
pub mod line_buffer;

// Re-export.
pub use cursor_mover::*;
pub use line_buffer::*;
