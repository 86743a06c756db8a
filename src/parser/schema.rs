//! Record schema definitions for parsed and merged debug records.
//!
//! This module defines the structure of the JSON artifacts we write to
//! disk. Every payload field is optional: log producers are not
//! consistent, and absence is handled explicitly downstream.

use crate::utils::config::{REQUEST_DEBUG_TYPE, RESPONSE_DEBUG_TYPE, UNKNOWN};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Outer log entry as written by the log producer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeRecord {
    /// Free-text message, possibly ending in a JSON payload
    pub message: String,

    /// Timestamp of the entry (kept raw; only strings are used)
    pub timestamp: Option<Value>,

    /// Log level, if the producer wrote one as a string
    pub level: Option<String>,
}

impl EnvelopeRecord {
    /// Read the envelope fields from a decoded log object
    ///
    /// The "@" keys Terraform writes win over their plain variants. Other
    /// keys are ignored and a wrongly typed message or level counts as
    /// absent.
    pub fn from_map(object: &Map<String, Value>) -> Self {
        let field = |primary: &str, fallback: &str| {
            object
                .get(primary)
                .filter(|v| !v.is_null())
                .or_else(|| object.get(fallback))
                .filter(|v| !v.is_null())
        };

        Self {
            message: field("@message", "message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            timestamp: field("@timestamp", "timestamp").cloned(),
            level: field("@level", "level")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Which side of a traced call a debug record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugRole {
    Request,
    Response,
}

impl FromStr for DebugRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            REQUEST_DEBUG_TYPE => Ok(DebugRole::Request),
            RESPONSE_DEBUG_TYPE => Ok(DebugRole::Response),
            other => Err(format!("unrecognized debug type '{}'", other)),
        }
    }
}

/// Inner payload extracted from an SDK debug log message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugRecord {
    /// Raw role string, e.g. "SDK DEBUG REQUEST"
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_type: Option<String>,

    /// Correlation key between a request and its response
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_method: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_url: Option<String>,

    /// HTTP status code (responses only)
    #[serde(
        default,
        deserialize_with = "lenient_u16",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_status_code: Option<u16>,

    /// Retry-After hint in seconds, if the SDK reported one
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_retry_after: Option<u64>,

    /// Timestamp copied from the envelope
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,

    /// Any other payload fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DebugRecord {
    /// Role of the record, if `debug_type` names one
    pub fn role(&self) -> Option<DebugRole> {
        self.debug_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Transaction identifier, if present and non-empty
    pub fn transaction_key(&self) -> Option<&str> {
        self.transaction_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A request joined with its response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Always "SDK DEBUG MERGE" for records produced by the matcher
    pub debug_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_retry_after: Option<u64>,

    #[serde(default)]
    pub request_timestamp: Option<String>,

    #[serde(default)]
    pub response_timestamp: Option<String>,

    /// Status code taken from the response
    #[serde(default, deserialize_with = "lenient_u16")]
    pub invocation_status_code: Option<u16>,

    /// URL with GUIDs replaced by a placeholder
    #[serde(default)]
    pub normalized_url: Option<String>,

    /// Response minus request time; null when either timestamp was unusable
    #[serde(default)]
    pub response_time_ms: Option<f64>,

    /// Remaining request payload fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MergedRecord {
    /// Grouping key "{method} {normalized_url}", each part defaulting to UNKNOWN
    pub fn group_key(&self) -> String {
        format!(
            "{} {}",
            self.invocation_method.as_deref().unwrap_or(UNKNOWN),
            self.normalized_url.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

/// Accept a string or a number for an identifier field
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Keep a string value; any other JSON type counts as absent
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accept a non-negative integer given as a number or a numeric string
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|n| u16::try_from(n).ok()))
}
