//! Plain-text response time table.

use crate::aggregator::GroupStats;
use crate::utils::config::{REPORT_KEY_WIDTH, REPORT_RULE_WIDTH, REPORT_VALUE_WIDTH};
use std::fmt::Write;

/// Render the statistics table
///
/// One row per group, in the order given. Keys longer than the key
/// column are cut to leave one separating space.
pub fn render_report(stats: &[GroupStats]) -> String {
    let rule = "-".repeat(REPORT_RULE_WIDTH);
    let kw = REPORT_KEY_WIDTH;
    let vw = REPORT_VALUE_WIDTH;

    let mut out = String::new();
    let _ = writeln!(out, "Response Time Statistics (in milliseconds):");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{:<kw$} {:<vw$} {:<vw$} {:<vw$} {:<vw$} {:<vw$} {:<vw$} {:<vw$}",
        "Method + URL", "Count", "Min", "Max", "Mean", "50%", "75%", "99%"
    );
    let _ = writeln!(out, "{}", rule);

    for row in stats {
        let _ = writeln!(out, "{}", render_row(row));
    }

    out
}

/// Render one table row
pub fn render_row(stats: &GroupStats) -> String {
    let kw = REPORT_KEY_WIDTH;
    let vw = REPORT_VALUE_WIDTH;
    let key = truncate_chars(&stats.key, kw - 1);

    format!(
        "{:<kw$} {:<vw$} {:<vw$.2} {:<vw$.2} {:<vw$.2} {:<vw$.2} {:<vw$.2} {:<vw$.2}",
        key, stats.count, stats.min, stats.max, stats.mean, stats.p50, stats.p75, stats.p99
    )
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
