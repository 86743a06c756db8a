use log_chomper::matcher::{
    count_guids, normalize_url, pair_records, response_time_ms, DuplicatePolicy,
};
use log_chomper::parser::DebugRecord;
use log_chomper::utils::{Diagnostics, Issue, Side};
use pretty_assertions::assert_eq;

fn record(debug_type: &str, id: Option<&str>, ts: &str) -> DebugRecord {
    DebugRecord {
        debug_type: Some(debug_type.to_string()),
        transaction_id: id.map(str::to_string),
        invocation_method: Some("GET".to_string()),
        invocation_url: Some("/api/v2/users/0f8fad5b-d9cb-469f-a165-70867728950e".to_string()),
        timestamp: Some(ts.to_string()),
        ..Default::default()
    }
}

fn request(id: &str, ts: &str) -> DebugRecord {
    record("SDK DEBUG REQUEST", Some(id), ts)
}

fn response(id: &str, ts: &str) -> DebugRecord {
    record("SDK DEBUG RESPONSE", Some(id), ts)
}

#[test]
fn test_only_complete_pairs_are_merged() {
    let records = vec![
        request("a", "2024-01-01T00:00:00Z"),
        request("b", "2024-01-01T00:00:00Z"),
        response("c", "2024-01-01T00:00:01Z"),
        response("a", "2024-01-01T00:00:00.500Z"),
        request("d", "2024-01-01T00:00:00Z"),
        response("d", "2024-01-01T00:00:00.001Z"),
    ];

    let mut diagnostics = Diagnostics::new();
    let outcome = pair_records(&records, DuplicatePolicy::KeepLast, &mut diagnostics);

    let ids: Vec<_> = outcome
        .merged
        .iter()
        .map(|m| m.transaction_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "d"]);
    assert_eq!(outcome.requests, 3);
    assert_eq!(outcome.responses, 2);
    assert_eq!(outcome.unmatched_requests, 1);
    assert_eq!(outcome.unmatched_responses, 1);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_ordering_follows_first_request_sighting() {
    let records = vec![
        request("x", "2024-01-01T00:00:00Z"),
        request("y", "2024-01-01T00:00:00Z"),
        response("y", "2024-01-01T00:00:00Z"),
        request("x", "2024-01-01T00:00:01Z"),
        response("x", "2024-01-01T00:00:02Z"),
    ];

    let outcome = pair_records(&records, DuplicatePolicy::KeepLast, &mut Diagnostics::new());
    let ids: Vec<_> = outcome
        .merged
        .iter()
        .map(|m| m.transaction_id.clone().unwrap())
        .collect();
    assert_eq!(ids, vec!["x", "y"]);
    assert_eq!(outcome.merged[0].response_time_ms, Some(1000.0));
}

#[test]
fn test_ineligible_records_are_skipped() {
    let records = vec![
        record("SDK DEBUG REQUEST", None, "2024-01-01T00:00:00Z"),
        record("SDK DEBUG REQUEST", Some(""), "2024-01-01T00:00:00Z"),
        record("SDK DEBUG SOMETHING", Some("t"), "2024-01-01T00:00:00Z"),
        response("t", "2024-01-01T00:00:00Z"),
    ];

    let mut diagnostics = Diagnostics::new();
    let outcome = pair_records(&records, DuplicatePolicy::KeepLast, &mut diagnostics);

    assert!(outcome.merged.is_empty());
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics.warning_count(), 0);
}

#[test]
fn test_duplicates_are_reported() {
    let records = vec![
        response("t", "2024-01-01T00:00:01Z"),
        response("t", "2024-01-01T00:00:02Z"),
        request("t", "2024-01-01T00:00:00Z"),
    ];

    let mut diagnostics = Diagnostics::new();
    pair_records(&records, DuplicatePolicy::KeepFirst, &mut diagnostics);

    assert_eq!(
        diagnostics.issues(),
        &[Issue::DuplicateTransaction {
            transaction_id: "t".to_string(),
            side: Side::Response,
            occurrences: 2,
        }]
    );
}

#[test]
fn test_unparseable_timestamp_yields_null_time() {
    let records = vec![
        request("t", "2024-01-01T00:00:00Z"),
        response("t", ""),
    ];

    let mut diagnostics = Diagnostics::new();
    let outcome = pair_records(&records, DuplicatePolicy::KeepLast, &mut diagnostics);

    assert_eq!(outcome.merged.len(), 1);
    assert_eq!(outcome.merged[0].response_time_ms, None);
    assert!(matches!(
        &diagnostics.issues()[0],
        Issue::InvalidTimestamp { transaction_id, .. } if transaction_id == "t"
    ));
}

#[test]
fn test_guid_normalization_round_trip() {
    let guids = [
        "123e4567-e89b-12d3-a456-426614174000",
        "AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE",
        "0f8fad5b-d9cb-469f-a165-70867728950e",
    ];
    let url = format!(
        "https://api.mypurecloud.com/api/v2/a/{}/b/{}/c/{}?id=42",
        guids[0], guids[1], guids[2]
    );

    let normalized = normalize_url(&url);
    assert_eq!(count_guids(&url), 3);
    assert_eq!(count_guids(&normalized), 0);
    assert_eq!(normalized.matches("{GUID}").count(), 3);
    assert_eq!(normalize_url(&normalized), normalized);

    let plain = "/api/v2/users/42/profile";
    assert_eq!(normalize_url(plain), plain);
}

#[test]
fn test_latency_of_quarter_second() {
    assert_eq!(
        response_time_ms(Some("2024-01-01T00:00:00Z"), Some("2024-01-01T00:00:00.250Z")).unwrap(),
        250.0
    );
}
