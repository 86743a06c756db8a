//! Configuration and constants for the pipeline.

/// Substring pattern that marks a log message as an SDK debug record
pub const DEBUG_MARKER_PATTERN: &str = r"SDK DEBUG (REQUEST|RESPONSE)";

/// Role strings carried in the `debug_type` field of a debug payload
pub const REQUEST_DEBUG_TYPE: &str = "SDK DEBUG REQUEST";
pub const RESPONSE_DEBUG_TYPE: &str = "SDK DEBUG RESPONSE";
pub const MERGE_DEBUG_TYPE: &str = "SDK DEBUG MERGE";

/// Placeholder written in place of every GUID in a normalized URL
pub const GUID_PLACEHOLDER: &str = "{GUID}";

/// File name prefix of the merged-records artifact
pub const MERGED_FILE_PREFIX: &str = "time";

/// Group key component used when a method or URL is absent
pub const UNKNOWN: &str = "UNKNOWN";

// Report layout
pub const REPORT_RULE_WIDTH: usize = 100;
pub const REPORT_KEY_WIDTH: usize = 40;
pub const REPORT_VALUE_WIDTH: usize = 8;

