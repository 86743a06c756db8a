//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;

// Re-export main command functions
pub use analyze::{
    analyze_response_times, execute_analyze, merge_request_response, process_log_file,
    validate_args, AnalyzeArgs, RunSummary,
};
