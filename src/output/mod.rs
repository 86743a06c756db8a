//! Output writers for pipeline artifacts and reports.
//!
//! This module handles:
//! - JSON artifacts (parsed and merged records)
//! - The plain-text statistics table

pub mod json;
pub mod report;

// Re-export main functions
pub use json::{merged_output_path, read_records, validate_path, write_records};
pub use report::{render_report, render_row};
