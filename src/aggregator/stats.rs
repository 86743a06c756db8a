//! Descriptive statistics for response time groups.
//!
//! Groups are keyed by method plus normalized URL. Percentiles use linear
//! interpolation between the closest ranks, the same definition numpy
//! uses by default.

use crate::parser::schema::MergedRecord;
use indexmap::IndexMap;
use log::debug;

/// Statistics for one endpoint group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    /// "{method} {normalized_url}"
    pub key: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p75: f64,
    pub p99: f64,
}

/// Collect the known response times of each group
///
/// **Public** - first half of the analysis stage
///
/// Records with a null response time are left out. A group only appears
/// once it has a sample, so groups never end up empty.
pub fn group_response_times(records: &[MergedRecord]) -> IndexMap<String, Vec<f64>> {
    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();

    for record in records {
        if let Some(ms) = record.response_time_ms {
            groups.entry(record.group_key()).or_default().push(ms);
        }
    }

    debug!("Grouped {} records into {} groups", records.len(), groups.len());
    groups
}

/// Compute statistics for every group
///
/// **Public** - second half of the analysis stage
///
/// # Returns
/// One entry per non-empty group, sorted by descending sample count.
/// Groups with equal counts keep their encounter order.
pub fn compute_statistics(groups: &IndexMap<String, Vec<f64>>) -> Vec<GroupStats> {
    let mut stats: Vec<GroupStats> = groups
        .iter()
        .filter_map(|(key, samples)| summarize(key, samples))
        .collect();

    // sort_by is stable
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Statistics for one sample set, `None` when it is empty
pub fn summarize(key: &str, samples: &[f64]) -> Option<GroupStats> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;

    Some(GroupStats {
        key: key.to_string(),
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean,
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        p99: percentile(&sorted, 99.0),
    })
}

/// Linear-interpolation percentile of an ascending sample set
///
/// `q` is in percent (0..=100). Returns NaN for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
