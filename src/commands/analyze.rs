//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Parses SDK debug records out of the input log and writes them
//! 2. Pairs requests with responses and writes the merged records
//! 3. Computes response time statistics per endpoint
//!
//! Each stage reads the artifact written by the previous one. An I/O
//! failure halts the run at the stage where it happens; record-level
//! problems only end up in the diagnostics.

use crate::aggregator::{compute_statistics, group_response_times, unique_methods, GroupStats};
use crate::matcher::{pair_records, DuplicatePolicy, MatchOutcome};
use crate::output::{merged_output_path, read_records, validate_path, write_records};
use crate::parser::{parse_log, DebugRecord, MergedRecord};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::InputError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Line-delimited JSON log to read
    pub input_log: PathBuf,

    /// Output path for the parsed debug records
    pub output_json: PathBuf,

    /// How repeated transaction ids are paired
    pub duplicate_policy: DuplicatePolicy,
}

impl AnalyzeArgs {
    pub fn new(input_log: impl Into<PathBuf>, output_json: impl Into<PathBuf>) -> Self {
        Self {
            input_log: input_log.into(),
            output_json: output_json.into(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Counts and results of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub lines_read: usize,
    pub debug_records: usize,
    pub merged_path: PathBuf,
    pub merged_records: usize,
    pub unmatched_requests: usize,
    pub unmatched_responses: usize,
    pub stats: Vec<GroupStats>,
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or unreadable input log
/// * Artifact write or read failures
pub fn execute_analyze(args: &AnalyzeArgs, diagnostics: &mut Diagnostics) -> Result<RunSummary> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input_log.display());

    info!("Step 1/3: Extracting SDK debug records...");
    let (lines_read, debug_records) =
        process_log_file(&args.input_log, &args.output_json, diagnostics)?;

    info!("Step 2/3: Matching requests with responses...");
    let merged_path = merged_output_path(&args.output_json)
        .context("Failed to derive merged output path")?;
    let outcome = merge_request_response(
        &args.output_json,
        &merged_path,
        args.duplicate_policy,
        diagnostics,
    )?;

    info!("Step 3/3: Analyzing response times...");
    let stats = analyze_response_times(&merged_path)?;

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(RunSummary {
        lines_read,
        debug_records,
        merged_path,
        merged_records: outcome.merged.len(),
        unmatched_requests: outcome.unmatched_requests,
        unmatched_responses: outcome.unmatched_responses,
        stats,
    })
}

/// Parse the input log and write the debug records artifact
///
/// **Public** - stage 1
///
/// # Returns
/// Lines read and debug records written
pub fn process_log_file(
    input_path: &Path,
    output_path: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<(usize, usize)> {
    let file = open_input(input_path)?;

    let outcome = parse_log(BufReader::new(file), diagnostics).map_err(|source| {
        InputError::Unreadable {
            path: input_path.to_path_buf(),
            source,
        }
    })?;

    write_records(&outcome.records, output_path)
        .context("Failed to write parsed debug records")?;

    info!(
        "Successfully processed {} SDK DEBUG entries from {} lines to {}",
        outcome.records.len(),
        outcome.lines_read,
        output_path.display()
    );

    Ok((outcome.lines_read, outcome.records.len()))
}

/// Pair the parsed records and write the merged records artifact
///
/// **Public** - stage 2
pub fn merge_request_response(
    parsed_path: &Path,
    merged_path: &Path,
    policy: DuplicatePolicy,
    diagnostics: &mut Diagnostics,
) -> Result<MatchOutcome> {
    let records: Vec<DebugRecord> =
        read_records(parsed_path).context("Failed to read parsed debug records")?;

    log_methods(
        "input",
        records.iter().map(|r| r.invocation_method.as_deref()),
    );

    let outcome = pair_records(&records, policy, diagnostics);

    info!(
        "{} request and {} response transactions; {} without response, {} without request",
        outcome.requests, outcome.responses, outcome.unmatched_requests, outcome.unmatched_responses
    );

    write_records(&outcome.merged, merged_path)
        .context("Failed to write merged records")?;

    info!(
        "Successfully merged {} request-response pairs to {}",
        outcome.merged.len(),
        merged_path.display()
    );

    Ok(outcome)
}

/// Compute per-endpoint statistics from the merged records artifact
///
/// **Public** - stage 3
pub fn analyze_response_times(merged_path: &Path) -> Result<Vec<GroupStats>> {
    let records: Vec<MergedRecord> =
        read_records(merged_path).context("Failed to read merged records")?;

    log_methods(
        "analysis",
        records.iter().map(|r| r.invocation_method.as_deref()),
    );

    let groups = group_response_times(&records);
    let stats = compute_statistics(&groups);

    debug!("Computed statistics for {} endpoint groups", stats.len());

    Ok(stats)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input_log.as_os_str().is_empty() {
        anyhow::bail!("Input log path cannot be empty");
    }

    validate_path(&args.output_json).context("Invalid output path")?;

    let merged_path = merged_output_path(&args.output_json)?;
    validate_path(&merged_path).context("Invalid merged output path")?;

    Ok(())
}

fn open_input(path: &Path) -> Result<File, InputError> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn log_methods<'a>(stage: &str, methods: impl IntoIterator<Item = Option<&'a str>>) {
    let methods: Vec<&str> = unique_methods(methods).into_iter().collect();
    info!("Found methods in {} records: [{}]", stage, methods.join(", "));
}
