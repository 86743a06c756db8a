//! Line parser for SDK debug log output.
//!
//! Turns raw log lines into `DebugRecord`s. A line is an envelope JSON
//! object whose message may end with an embedded JSON payload; only
//! messages carrying the SDK debug marker are considered.

use super::schema::{DebugRecord, EnvelopeRecord};
use crate::utils::config::DEBUG_MARKER_PATTERN;
use crate::utils::diagnostics::{Diagnostics, Issue};
use crate::utils::error::ParseError;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::io::{self, BufRead};
use std::sync::OnceLock;

fn debug_marker_re() -> &'static Regex {
    static DEBUG_MARKER_RE: OnceLock<Regex> = OnceLock::new();
    DEBUG_MARKER_RE.get_or_init(|| Regex::new(DEBUG_MARKER_PATTERN).expect("valid marker regex"))
}

fn trailing_json_re() -> &'static Regex {
    static TRAILING_JSON_RE: OnceLock<Regex> = OnceLock::new();
    TRAILING_JSON_RE.get_or_init(|| Regex::new(r"\{.*\}$").expect("valid trailing json regex"))
}

/// Result of parsing a whole log
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Debug records in log order
    pub records: Vec<DebugRecord>,

    /// Number of lines read, blank lines included
    pub lines_read: usize,
}

/// Parse every line of a log
///
/// **Public** - main entry point for the parsing stage
///
/// Malformed lines are reported to `diagnostics` and skipped. Invalid
/// UTF-8 is replaced rather than rejected.
///
/// # Errors
/// Only a failure of the underlying reader is returned.
pub fn parse_log<R: BufRead>(
    mut reader: R,
    diagnostics: &mut Diagnostics,
) -> io::Result<ParseOutcome> {
    let mut outcome = ParseOutcome::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        outcome.lines_read += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = parse_line(&line, outcome.lines_read, diagnostics) {
            outcome.records.push(record);
        }
    }

    debug!(
        "Parsed {} debug records from {} lines",
        outcome.records.len(),
        outcome.lines_read
    );

    Ok(outcome)
}

/// Parse one log line into a debug record
///
/// **Public** - also useful on its own for single-line inspection
///
/// Returns `None` for blank lines, non-debug messages, and lines that fail
/// to decode (the latter are recorded in `diagnostics`).
pub fn parse_line(
    line: &str,
    line_number: usize,
    diagnostics: &mut Diagnostics,
) -> Option<DebugRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let envelope = match decode_envelope(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            diagnostics.record(Issue::MalformedLine {
                line_number,
                content: line.to_string(),
                error: e.to_string(),
            });
            return None;
        }
    };

    if !debug_marker_re().is_match(&envelope.message) {
        return None;
    }

    let payload = extract_trailing_json(&envelope.message)?;

    let mut record = match serde_json::from_str::<DebugRecord>(payload) {
        Ok(record) => record,
        Err(e) => {
            diagnostics.record(Issue::MalformedPayload {
                line_number,
                content: line.to_string(),
                error: e.to_string(),
            });
            return None;
        }
    };

    match envelope.timestamp {
        Some(Value::String(ts)) if !ts.is_empty() => record.timestamp = Some(ts),
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => diagnostics.record(Issue::NonStringTimestamp { line_number }),
    }

    Some(record)
}

/// Decode the outer envelope object
///
/// **Private** - internal helper for parse_line
fn decode_envelope(line: &str) -> Result<EnvelopeRecord, ParseError> {
    match serde_json::from_str::<Value>(line)? {
        Value::Object(object) => Ok(EnvelopeRecord::from_map(&object)),
        other => Err(ParseError::InvalidFormat(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Locate the JSON object appended to the end of a message
///
/// **Public** - exposed for testing
///
/// The object runs from the first `{` of the message's last line to the
/// closing `}` that ends the message.
pub fn extract_trailing_json(message: &str) -> Option<&str> {
    trailing_json_re()
        .find(message.trim_end())
        .map(|m| m.as_str())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
