// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Conversion between the raw bytes of a terminal channel and codepoints.

// Attach sources.
pub mod decoder;
pub mod encoder;

// Re-export.
pub use decoder::*;
pub use encoder::*;
