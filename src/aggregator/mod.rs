//! Aggregation of merged records into per-endpoint statistics.
//!
//! This module transforms merged request/response pairs into:
//! - Response time samples grouped by method and normalized URL
//! - Count, min, max, mean and p50/p75/p99 per group
//! - The set of invocation methods seen in a record set

pub mod stats;

use std::collections::BTreeSet;

// Re-export main types and functions
pub use stats::{compute_statistics, group_response_times, percentile, summarize, GroupStats};

/// Distinct invocation methods, sorted
pub fn unique_methods<'a, I>(methods: I) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    methods.into_iter().flatten().collect()
}
