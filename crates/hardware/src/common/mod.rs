//! Common types shared across the predictor.
//!
//! This module provides the small building blocks the prediction units rely on:
//! 1. **Error Handling:** Fatal configuration errors raised at construction.
//! 2. **Bounded Widths:** Validated bit widths for history registers and counters.
//! 3. **Thread Identity:** Strong type for hardware thread contexts.

/// Error types for predictor construction.
pub mod error;

/// Hardware thread identifiers.
pub mod thread;

/// Validated bit widths and the masks derived from them.
pub mod width;

pub use error::ConfigError;
pub use thread::ThreadId;
pub use width::{CounterWidth, HistoryWidth};
