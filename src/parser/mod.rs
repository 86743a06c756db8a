//! Log line parsing and record schema definitions.
//!
//! This module handles:
//! - Decoding envelope log lines
//! - Detecting SDK debug messages
//! - Extracting the embedded request/response payload
//! - Defining the artifact schema

pub mod log_line;
pub mod schema;

// Re-export main types
pub use log_line::{extract_trailing_json, parse_line, parse_log, ParseOutcome};
pub use schema::{DebugRecord, DebugRole, EnvelopeRecord, MergedRecord};
