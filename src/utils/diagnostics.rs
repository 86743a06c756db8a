//! Record-level issue collection.
//!
//! Every stage receives a `&mut Diagnostics` and reports the records it
//! had to skip. Issues are logged as they are recorded and kept so that
//! callers (and tests) can inspect exactly what went wrong in a run.

use log::{log, Level};
use std::fmt;

/// Pairing role named in a duplicate-transaction issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Request,
    Response,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Request => f.write_str("request"),
            Side::Response => f.write_str("response"),
        }
    }
}

/// A single record that could not be used as-is
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// The line is not a JSON object
    MalformedLine {
        line_number: usize,
        content: String,
        error: String,
    },

    /// The line carried a debug marker but its trailing payload did not decode
    MalformedPayload {
        line_number: usize,
        content: String,
        error: String,
    },

    /// The envelope timestamp was present but not a string
    NonStringTimestamp { line_number: usize },

    /// A debug record without a usable role or transaction identifier
    IneligibleRecord { index: usize, reason: String },

    /// More than one record of one role shares a transaction identifier
    DuplicateTransaction {
        transaction_id: String,
        side: Side,
        occurrences: usize,
    },

    /// Response time could not be computed for a pair
    InvalidTimestamp {
        transaction_id: String,
        error: String,
    },
}

impl Issue {
    /// Log level the issue is reported at
    pub fn level(&self) -> Level {
        match self {
            Issue::IneligibleRecord { .. } => Level::Debug,
            _ => Level::Warn,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MalformedLine {
                line_number,
                content,
                error,
            } => write!(
                f,
                "Error parsing log line {}: {}. Error: {}",
                line_number, content, error
            ),
            Issue::MalformedPayload {
                line_number,
                content,
                error,
            } => write!(
                f,
                "Error parsing inner JSON in line {}: {}. Error: {}",
                line_number, content, error
            ),
            Issue::NonStringTimestamp { line_number } => {
                write!(f, "Ignoring non-string timestamp on line {}", line_number)
            }
            Issue::IneligibleRecord { index, reason } => {
                write!(f, "Skipping debug record {}: {}", index, reason)
            }
            Issue::DuplicateTransaction {
                transaction_id,
                side,
                occurrences,
            } => write!(
                f,
                "Transaction {} has {} {} records",
                transaction_id, occurrences, side
            ),
            Issue::InvalidTimestamp {
                transaction_id,
                error,
            } => write!(
                f,
                "Error calculating time difference for transaction {}: {}",
                transaction_id, error
            ),
        }
    }
}

/// Collector for the issues of one pipeline run
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the issue and keep it
    pub fn record(&mut self, issue: Issue) {
        log!(issue.level(), "{}", issue);
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues at warning level or above
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level() <= Level::Warn)
            .count()
    }
}
