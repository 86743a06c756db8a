//! Response time calculation from request/response timestamps.

use crate::utils::diagnostics::{Diagnostics, Issue};
use crate::utils::error::TimestampError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};

// Offset-aware layouts tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A parsed timestamp, with or without a UTC offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// Parse an ISO-8601-like timestamp
///
/// A trailing `Z` is read as `+00:00`.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, TimestampError> {
    let value = value.trim();
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(Timestamp::Offset(dt));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(Timestamp::Offset(dt));
        }
    }

    let mut last_err = None;
    for fmt in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(&normalized, fmt) {
            Ok(dt) => return Ok(Timestamp::Naive(dt)),
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(source) => Err(TimestampError::Invalid {
            value: value.to_string(),
            source,
        }),
        // NAIVE_FORMATS is never empty
        None => Err(TimestampError::Missing("timestamp")),
    }
}

/// Milliseconds from `request` to `response`
///
/// Negative when the response is stamped before the request; that is
/// reported as-is.
pub fn response_time_ms(
    request: Option<&str>,
    response: Option<&str>,
) -> Result<f64, TimestampError> {
    let request = parse_timestamp(non_empty(request).ok_or(TimestampError::Missing("request"))?)?;
    let response =
        parse_timestamp(non_empty(response).ok_or(TimestampError::Missing("response"))?)?;

    let delta: TimeDelta = match (request, response) {
        (Timestamp::Offset(req), Timestamp::Offset(resp)) => resp.signed_duration_since(req),
        (Timestamp::Naive(req), Timestamp::Naive(resp)) => resp.signed_duration_since(req),
        _ => return Err(TimestampError::MixedOffsets),
    };

    let micros = delta.num_microseconds().ok_or(TimestampError::OutOfRange)?;
    Ok(micros as f64 / 1000.0)
}

/// Response time for one transaction, or `None` if it cannot be computed
///
/// Failures are recorded against `transaction_id` and never raised.
pub fn calculate_response_time(
    request: Option<&str>,
    response: Option<&str>,
    transaction_id: &str,
    diagnostics: &mut Diagnostics,
) -> Option<f64> {
    match response_time_ms(request, response) {
        Ok(ms) => Some(ms),
        Err(e) => {
            diagnostics.record(Issue::InvalidTimestamp {
                transaction_id: transaction_id.to_string(),
                error: e.to_string(),
            });
            None
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
