// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod history;
pub mod input_processor;
pub mod readline;

// Re-export.
pub use history::*;
pub use input_processor::*;
pub use readline::*;
