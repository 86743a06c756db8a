use log_chomper::commands::{execute_analyze, AnalyzeArgs};
use log_chomper::matcher::DuplicatePolicy;
use log_chomper::output::read_records;
use log_chomper::parser::{DebugRecord, MergedRecord};
use log_chomper::utils::{Diagnostics, Issue};
use serde_json::json;
use std::fs;
use std::path::Path;

const USER_URL: &str = "/api/v2/users/123e4567-e89b-12d3-a456-426614174000";

fn sdk_line(role: &str, id: &str, method: &str, url: &str, ts: &str) -> String {
    let payload = json!({
        "debug_type": format!("SDK DEBUG {}", role),
        "transaction_id": id,
        "invocation_method": method,
        "invocation_url": url,
        "invocation_status_code": 200,
    });
    json!({
        "@level": "info",
        "@message": format!("SDK DEBUG {} {}", role, payload),
        "@timestamp": ts,
    })
    .to_string()
}

fn write_log(dir: &Path, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join("terraform.log");
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_full_pipeline() {
    let temp_dir = tempfile::tempdir().unwrap();
    let lines = vec![
        json!({"@message": "Terraform 1.7.0", "@timestamp": "2024-01-01T00:00:00Z"}).to_string(),
        sdk_line("REQUEST", "t1", "GET", USER_URL, "2024-01-01T00:00:00Z"),
        "this line is not json".to_string(),
        sdk_line("RESPONSE", "t1", "GET", USER_URL, "2024-01-01T00:00:00.250Z"),
        sdk_line("REQUEST", "t2", "GET", "/api/v2/users/0f8fad5b-d9cb-469f-a165-70867728950e", "2024-01-01T00:00:01Z"),
        sdk_line("RESPONSE", "t2", "GET", "", "2024-01-01T00:00:01.150Z"),
        sdk_line("REQUEST", "t3", "POST", "/api/v2/flows", "2024-01-01T00:00:02Z"),
        sdk_line("REQUEST", "t4", "DELETE", "/api/v2/flows/1", "2024-01-01T00:00:03Z"),
        sdk_line("RESPONSE", "t4", "DELETE", "", "not-a-time"),
    ];
    let input = write_log(temp_dir.path(), &lines);
    let output = temp_dir.path().join("out").join("sdk.json");

    let mut diagnostics = Diagnostics::new();
    let summary = execute_analyze(&AnalyzeArgs::new(&input, &output), &mut diagnostics).unwrap();

    assert_eq!(summary.lines_read, 9);
    assert_eq!(summary.debug_records, 7);
    assert_eq!(summary.merged_records, 3);
    assert_eq!(summary.unmatched_requests, 1);
    assert_eq!(summary.unmatched_responses, 0);
    assert_eq!(summary.merged_path, temp_dir.path().join("out").join("timesdk.json"));

    let parsed: Vec<DebugRecord> = read_records(&output).unwrap();
    assert_eq!(parsed.len(), 7);

    let merged: Vec<MergedRecord> = read_records(&summary.merged_path).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].response_time_ms, Some(250.0));
    assert_eq!(merged[2].response_time_ms, None);

    assert_eq!(summary.stats.len(), 1);
    assert_eq!(summary.stats[0].key, "GET /api/v2/users/{GUID}");
    assert_eq!(summary.stats[0].count, 2);
    assert_eq!(summary.stats[0].mean, 200.0);

    let kinds: Vec<&str> = diagnostics
        .issues()
        .iter()
        .map(|issue| match issue {
            Issue::MalformedLine { .. } => "line",
            Issue::InvalidTimestamp { .. } => "timestamp",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["line", "timestamp"]);
}

#[test]
fn test_merged_artifact_keeps_null_response_time() {
    let temp_dir = tempfile::tempdir().unwrap();
    let lines = vec![
        sdk_line("REQUEST", "t1", "GET", "/a", "2024-01-01T00:00:00Z"),
        sdk_line("RESPONSE", "t1", "GET", "/a", ""),
    ];
    let input = write_log(temp_dir.path(), &lines);
    let output = temp_dir.path().join("sdk.json");

    let summary =
        execute_analyze(&AnalyzeArgs::new(&input, &output), &mut Diagnostics::new()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.merged_path).unwrap()).unwrap();
    assert_eq!(raw[0]["response_time_ms"], serde_json::Value::Null);
    assert_eq!(raw[0]["debug_type"], "SDK DEBUG MERGE");
    assert!(summary.stats.is_empty());
}

#[test]
fn test_keep_all_policy_through_pipeline() {
    let temp_dir = tempfile::tempdir().unwrap();
    let lines = vec![
        sdk_line("REQUEST", "retry", "PUT", "/a", "2024-01-01T00:00:00Z"),
        sdk_line("RESPONSE", "retry", "PUT", "/a", "2024-01-01T00:00:00.010Z"),
        sdk_line("REQUEST", "retry", "PUT", "/a", "2024-01-01T00:00:01Z"),
        sdk_line("RESPONSE", "retry", "PUT", "/a", "2024-01-01T00:00:01.030Z"),
    ];
    let input = write_log(temp_dir.path(), &lines);
    let mut args = AnalyzeArgs::new(&input, temp_dir.path().join("sdk.json"));
    args.duplicate_policy = DuplicatePolicy::KeepAll;

    let summary = execute_analyze(&args, &mut Diagnostics::new()).unwrap();

    assert_eq!(summary.merged_records, 2);
    assert_eq!(summary.stats[0].count, 2);
    assert_eq!(summary.stats[0].mean, 20.0);
}

#[test]
fn test_missing_input_halts_before_writing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("sdk.json");
    let args = AnalyzeArgs::new(temp_dir.path().join("missing.log"), &output);

    let err = execute_analyze(&args, &mut Diagnostics::new()).unwrap_err();

    assert!(err.to_string().contains("not found"));
    assert!(!output.exists());
    assert!(!temp_dir.path().join("timesdk.json").exists());
}

#[test]
fn test_empty_log_produces_empty_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_log(temp_dir.path(), &[]);
    let output = temp_dir.path().join("sdk.json");

    let summary =
        execute_analyze(&AnalyzeArgs::new(&input, &output), &mut Diagnostics::new()).unwrap();

    assert_eq!(summary.lines_read, 0);
    assert_eq!(summary.merged_records, 0);
    assert!(summary.stats.is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap().trim(), "[]");
}

#[test]
fn test_cli_reports_missing_input_with_logging_off() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.log");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_log-chomper"))
        .arg(&missing)
        .arg(dir.path().join("out.json"))
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "), "stderr was: {}", stderr);
    assert!(stderr.contains("absent.log"), "stderr was: {}", stderr);
}
