//! Match diagnostics and the final merge result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names matched by a single pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatches {
    /// The pattern as it was compiled.
    pub pattern: String,

    /// Matching variable names, sorted ascending.
    pub matched_names: Vec<String>,
}

/// Per-pattern diagnostics keyed by pattern position (generated patterns
/// included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchReport {
    entries: BTreeMap<usize, PatternMatches>,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, pattern: String, matched_names: Vec<String>) {
        self.entries.insert(
            index,
            PatternMatches {
                pattern,
                matched_names,
            },
        );
    }

    pub fn get(&self, index: usize) -> Option<&PatternMatches> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PatternMatches)> {
        self.entries.iter().map(|(index, matches)| (*index, matches))
    }

    /// Total number of matched names across all patterns, duplicates counted.
    pub fn total_matches(&self) -> usize {
        self.entries.values().map(|m| m.matched_names.len()).sum()
    }
}

/// Outcome of a lookup: the merged mapping plus how it was assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged: Map<String, Value>,
    pub report: MatchReport,
}

impl MergeResult {
    pub fn into_parts(self) -> (Map<String, Value>, MatchReport) {
        (self.merged, self.report)
    }
}
