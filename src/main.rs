//! Log Chomper CLI
//!
//! Extracts SDK debug request/response pairs from a line-delimited JSON
//! log and prints response time statistics per endpoint.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use log_chomper::commands::{execute_analyze, validate_args, AnalyzeArgs, RunSummary};
use log_chomper::output::render_report;
use log_chomper::utils::Diagnostics;

/// Log Chomper - response time analysis for SDK debug logs
#[derive(Parser, Debug)]
#[command(name = "log-chomper")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the input log file
    input_file: PathBuf,

    /// Path to the output JSON file
    output_file: PathBuf,
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let args = AnalyzeArgs::new(cli.input_file, cli.output_file);

    // Validate args first
    validate_args(&args)?;

    let mut diagnostics = Diagnostics::new();
    let summary = execute_analyze(&args, &mut diagnostics)?;

    println!();
    print!("{}", render_report(&summary.stats));
    print_summary(&summary, &diagnostics);

    Ok(())
}

/// Print the run totals after the table
///
/// **Private** - internal command output
fn print_summary(summary: &RunSummary, diagnostics: &Diagnostics) {
    println!();
    println!("{}", "=".repeat(60));
    println!("Lines read:          {}", summary.lines_read);
    println!("SDK debug records:   {}", summary.debug_records);
    println!("Merged pairs:        {}", summary.merged_records);
    println!("Unmatched requests:  {}", summary.unmatched_requests);
    println!("Unmatched responses: {}", summary.unmatched_responses);
    println!("Endpoint groups:     {}", summary.stats.len());
    println!("Record issues:       {}", diagnostics.warning_count());
    println!("Merged records:      {}", summary.merged_path.display());
    println!("{}", "=".repeat(60));
}
