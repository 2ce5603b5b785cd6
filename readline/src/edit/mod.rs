// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Editing commands and the key bindings that trigger them.

// Attach sources.
pub mod action;
pub mod edit_mode;
pub mod key_binding;
pub mod keys;
pub mod motion;

// Re-export.
pub use action::*;
pub use edit_mode::*;
pub use key_binding::*;
pub use motion::*;
