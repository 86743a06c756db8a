//! URL normalization for endpoint grouping.
//!
//! Only GUID-shaped identifiers are replaced. Numeric ids and slugs are
//! left alone, so grouping is accurate for UUID-keyed resource APIs only.

use crate::utils::config::GUID_PLACEHOLDER;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

fn guid_re() -> &'static Regex {
    static GUID_RE: OnceLock<Regex> = OnceLock::new();
    GUID_RE.get_or_init(|| {
        Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("valid guid regex")
    })
}

/// Replace every GUID in `url` with the placeholder
pub fn normalize_url(url: &str) -> String {
    guid_re()
        .replace_all(url, NoExpand(GUID_PLACEHOLDER))
        .into_owned()
}

/// Number of GUID-shaped substrings in `url`
pub fn count_guids(url: &str) -> usize {
    guid_re().find_iter(url).count()
}
