//! Utility modules for configuration, error handling, and diagnostics.

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export commonly used types for convenience
pub use diagnostics::{Diagnostics, Issue, Side};
pub use error::{InputError, OutputError, ParseError, TimestampError};
