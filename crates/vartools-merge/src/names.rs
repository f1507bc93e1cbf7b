//! Pattern compilation and name matching.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{LookupError, LookupResult};
use crate::report::MatchReport;
use crate::scope::Namespace;

/// Validate untyped pattern entries, returning them as strings.
pub fn resolve_terms(terms: &[Value]) -> LookupResult<Vec<String>> {
    terms
        .iter()
        .enumerate()
        .map(|(index, term)| match term {
            Value::String(s) => Ok(s.clone()),
            other => Err(LookupError::PatternType {
                index,
                entry: other.to_string(),
                found: json_type_name(other),
            }),
        })
        .collect()
}

/// Compile a single pattern.
pub fn compile(pattern: &str) -> LookupResult<Regex> {
    Regex::new(pattern).map_err(|e| LookupError::PatternCompile {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Names in `namespace` containing a match for `regex`, sorted ascending.
pub fn matching_names(regex: &Regex, namespace: &Namespace) -> Vec<String> {
    let mut names: Vec<String> = namespace
        .keys()
        .filter(|name| regex.is_match(name))
        .cloned()
        .collect();
    names.sort();
    names
}

/// Match every pattern against the base namespace.
///
/// Returns the concatenation of each pattern's sorted matches, in pattern
/// order, with duplicates across patterns preserved, plus the per-pattern
/// report.
pub fn resolve_names(
    patterns: &[String],
    namespace: &Namespace,
) -> LookupResult<(Vec<String>, MatchReport)> {
    let mut names = Vec::new();
    let mut report = MatchReport::new();

    for (index, pattern) in patterns.iter().enumerate() {
        let regex = compile(pattern)?;
        let matched = matching_names(&regex, namespace);
        debug!(index, pattern = %pattern, matches = matched.len(), "pattern scanned");

        names.extend(matched.iter().cloned());
        report.insert(index, pattern.clone(), matched);
    }

    Ok((names, report))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
