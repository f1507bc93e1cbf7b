//! Auto-generated patterns for the two legacy naming schemes.
//!
//! - legacy: `d_<id>`, `d1_<id>`, `r_<id>`, ..., `<id>`, `a_<id>`, ..., `h2_<id>`
//! - default: `<id>_d`, `<id>_d1`, `<id>_d_extra`, `<id>_a3_extra`, ...
//!
//! The identifier is interpolated verbatim, so regex metacharacters in it
//! keep their meaning.

use crate::options::MergeOptions;

/// Prefixes for the legacy scheme, in merge order.
pub const LEGACY_PREFIXES: &[&str] = &[
    "d_", "d[0-9]+_", "r_", "r[0-9]+_", "", "a_", "a[0-9]+_", "g_", "g[0-9]+_", "h_", "h[0-9]+_",
];

/// Category letters for the default scheme, in merge order.
pub const DEFAULT_CATEGORIES: &[&str] = &["d", "r", "a", "g", "h"];

/// Patterns for the legacy prefix scheme: `^{prefix}{identifier}$`.
pub fn legacy_patterns(identifier: &str) -> Vec<String> {
    LEGACY_PREFIXES
        .iter()
        .map(|prefix| format!("^{}{}$", prefix, identifier))
        .collect()
}

/// Patterns for the default suffix scheme.
pub fn default_patterns(identifier: &str) -> Vec<String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|letter| format!(r"^{}_{}((([0-9]+)?(_(\S+)?$|$))|$)", identifier, letter))
        .collect()
}

/// Full pattern list: legacy-derived, then default-derived, then explicit.
///
/// Absent or empty identifiers contribute nothing.
pub fn expand_patterns(options: &MergeOptions, explicit: &[String]) -> Vec<String> {
    let mut patterns = Vec::new();

    if let Some(legacy) = options.legacy.as_deref().filter(|s| !s.is_empty()) {
        patterns.extend(legacy_patterns(legacy));
    }
    if let Some(default) = options.default.as_deref().filter(|s| !s.is_empty()) {
        patterns.extend(default_patterns(default));
    }
    patterns.extend(explicit.iter().cloned());

    patterns
}
