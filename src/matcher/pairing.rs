//! Join request and response debug records by transaction identifier.
//!
//! Records are indexed per role in insertion-ordered maps, so the merged
//! output follows the order in which request transaction ids were first
//! seen in the log.

use super::latency::calculate_response_time;
use super::normalize::normalize_url;
use crate::parser::schema::{DebugRecord, DebugRole, MergedRecord};
use crate::utils::config::MERGE_DEBUG_TYPE;
use crate::utils::diagnostics::{Diagnostics, Issue, Side};
use indexmap::IndexMap;
use log::debug;

/// Merged-record fields that must not be shadowed by payload extras
const RESERVED_FIELDS: &[&str] = &[
    "request_timestamp",
    "response_timestamp",
    "normalized_url",
    "response_time_ms",
    "timestamp",
];

/// What to do when one role has several records for the same transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Later records replace earlier ones
    #[default]
    KeepLast,

    /// The earliest record wins
    KeepFirst,

    /// Pair the n-th request with the n-th response; one merge per pair
    KeepAll,
}

/// Result of the matching stage
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub merged: Vec<MergedRecord>,

    /// Distinct request transaction ids
    pub requests: usize,

    /// Distinct response transaction ids
    pub responses: usize,

    /// Request transaction ids with no response
    pub unmatched_requests: usize,

    /// Response transaction ids with no request
    pub unmatched_responses: usize,
}

type TransactionIndex<'a> = IndexMap<&'a str, Vec<&'a DebugRecord>>;

/// Pair requests with responses
///
/// **Public** - main entry point for the matching stage
///
/// Records without a role or a transaction id are skipped. Transactions
/// seen on one side only produce nothing; they are only counted.
pub fn pair_records(
    records: &[DebugRecord],
    policy: DuplicatePolicy,
    diagnostics: &mut Diagnostics,
) -> MatchOutcome {
    let (requests, responses) = index_by_transaction(records, diagnostics);

    report_duplicates(&requests, Side::Request, diagnostics);
    report_duplicates(&responses, Side::Response, diagnostics);

    let mut merged = Vec::new();
    for (transaction_id, request_group) in &requests {
        let Some(response_group) = responses.get(transaction_id) else {
            continue;
        };

        for (request, response) in select_pairs(request_group, response_group, policy) {
            merged.push(merge_pair(transaction_id, request, response, diagnostics));
        }
    }

    let unmatched_requests = requests
        .keys()
        .filter(|id| !responses.contains_key(*id))
        .count();
    let unmatched_responses = responses
        .keys()
        .filter(|id| !requests.contains_key(*id))
        .count();

    debug!(
        "Matched {} pairs ({} unmatched requests, {} unmatched responses)",
        merged.len(),
        unmatched_requests,
        unmatched_responses
    );

    MatchOutcome {
        merged,
        requests: requests.len(),
        responses: responses.len(),
        unmatched_requests,
        unmatched_responses,
    }
}

/// Split eligible records into per-role indexes
///
/// **Private** - internal helper for pair_records
fn index_by_transaction<'a>(
    records: &'a [DebugRecord],
    diagnostics: &mut Diagnostics,
) -> (TransactionIndex<'a>, TransactionIndex<'a>) {
    let mut requests = TransactionIndex::new();
    let mut responses = TransactionIndex::new();

    for (index, record) in records.iter().enumerate() {
        let Some(role) = record.role() else {
            diagnostics.record(Issue::IneligibleRecord {
                index,
                reason: format!(
                    "unrecognized debug_type {:?}",
                    record.debug_type.as_deref().unwrap_or("<missing>")
                ),
            });
            continue;
        };
        let Some(transaction_id) = record.transaction_key() else {
            diagnostics.record(Issue::IneligibleRecord {
                index,
                reason: "missing transaction_id".to_string(),
            });
            continue;
        };

        let target = match role {
            DebugRole::Request => &mut requests,
            DebugRole::Response => &mut responses,
        };
        target.entry(transaction_id).or_default().push(record);
    }

    (requests, responses)
}

fn report_duplicates(index: &TransactionIndex<'_>, side: Side, diagnostics: &mut Diagnostics) {
    for (transaction_id, group) in index {
        if group.len() > 1 {
            diagnostics.record(Issue::DuplicateTransaction {
                transaction_id: transaction_id.to_string(),
                side,
                occurrences: group.len(),
            });
        }
    }
}

/// Choose which request/response records of one transaction get merged
///
/// **Private** - applies the duplicate policy
fn select_pairs<'a>(
    requests: &[&'a DebugRecord],
    responses: &[&'a DebugRecord],
    policy: DuplicatePolicy,
) -> Vec<(&'a DebugRecord, &'a DebugRecord)> {
    match policy {
        DuplicatePolicy::KeepLast => requests
            .last()
            .zip(responses.last())
            .map(|(req, resp)| vec![(*req, *resp)])
            .unwrap_or_default(),
        DuplicatePolicy::KeepFirst => requests
            .first()
            .zip(responses.first())
            .map(|(req, resp)| vec![(*req, *resp)])
            .unwrap_or_default(),
        DuplicatePolicy::KeepAll => requests
            .iter()
            .zip(responses.iter())
            .map(|(req, resp)| (*req, *resp))
            .collect(),
    }
}

/// Build the merged record for one request/response pair
///
/// **Public** - exposed for testing
pub fn merge_pair(
    transaction_id: &str,
    request: &DebugRecord,
    response: &DebugRecord,
    diagnostics: &mut Diagnostics,
) -> MergedRecord {
    let request_timestamp = request.timestamp.clone();
    let response_timestamp = response.timestamp.clone();

    let response_time_ms = calculate_response_time(
        request_timestamp.as_deref(),
        response_timestamp.as_deref(),
        transaction_id,
        diagnostics,
    );

    let mut extra = request.extra.clone();
    for field in RESERVED_FIELDS {
        extra.remove(*field);
    }

    MergedRecord {
        debug_type: MERGE_DEBUG_TYPE.to_string(),
        transaction_id: Some(transaction_id.to_string()),
        invocation_method: request.invocation_method.clone(),
        invocation_url: request.invocation_url.clone(),
        invocation_retry_after: request.invocation_retry_after,
        request_timestamp,
        response_timestamp,
        invocation_status_code: response.invocation_status_code,
        normalized_url: request.invocation_url.as_deref().map(normalize_url),
        response_time_ms,
        extra,
    }
}
