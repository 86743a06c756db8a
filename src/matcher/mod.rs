//! Transaction matching of request and response debug records.
//!
//! This module transforms parsed debug records into:
//! - Request/response pairs keyed by transaction id
//! - Normalized endpoint URLs (GUIDs replaced)
//! - Response times in milliseconds

pub mod latency;
pub mod normalize;
pub mod pairing;

// Re-export main types and functions
pub use latency::{calculate_response_time, parse_timestamp, response_time_ms, Timestamp};
pub use normalize::{count_guids, normalize_url};
pub use pairing::{merge_pair, pair_records, DuplicatePolicy, MatchOutcome};
