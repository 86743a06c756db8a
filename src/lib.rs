//! Log Chomper
//!
//! Extracts SDK debug request/response telemetry from line-delimited
//! JSON logs, pairs requests with their responses and reports latency
//! statistics per endpoint.
//!
//! This crate provides the core implementation for the
//! `log-chomper` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! log-chomper terraform.log sdk_debug.json
//! ```
//!
//! The run writes `sdk_debug.json` (parsed debug records) and
//! `timesdk_debug.json` (merged request/response pairs), then prints a
//! response time table to stdout.

pub mod aggregator;
pub mod commands;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod utils;
