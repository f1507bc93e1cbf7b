//! Lookup output envelope
//!
//! Wraps a merge result with the sources that fed it, for JSON output, and
//! renders a human-readable explanation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vartools_merge::{MatchReport, MergeResult};

use crate::namespace::{NamespaceOrigin, NamespaceSource};

/// Schema version for lookup output
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "vartools/lookup@1";

/// Merge result with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupOutput {
    pub schema_version: u32,
    pub schema_id: String,

    /// When the lookup ran
    pub created_at: DateTime<Utc>,

    /// The merged mapping
    pub merged: Map<String, Value>,

    /// Matches per pattern, keyed by pattern index
    pub report: MatchReport,

    /// Files the namespaces were loaded from
    pub sources: Vec<NamespaceSource>,
}

impl LookupOutput {
    pub fn new(result: MergeResult, sources: Vec<NamespaceSource>) -> Self {
        let (merged, report) = result.into_parts();
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            merged,
            report,
            sources,
        }
    }

    /// Full envelope as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Just the merged mapping as pretty JSON.
    pub fn merged_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.merged)
    }

    /// The `[merged, report]` pair as pretty JSON.
    pub fn pair_json(&self) -> Result<String, serde_json::Error> {
        let pair = Value::Array(vec![
            Value::Object(self.merged.clone()),
            serde_json::to_value(&self.report)?,
        ]);
        serde_json::to_string_pretty(&pair)
    }

    /// Human-readable explanation of the lookup.
    pub fn to_human(&self) -> String {
        let mut lines = explain_report(&self.report);

        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push("Sources:".to_string());
            for source in &self.sources {
                let origin = match source.origin {
                    NamespaceOrigin::Base => "base",
                    NamespaceOrigin::Context => "context",
                };
                lines.push(format!("  [{}] {} ({})", origin, source.path, short_digest(&source.digest)));
            }
        }

        lines.push(String::new());
        lines.push("Merged:".to_string());
        let merged = serde_json::to_string_pretty(&self.merged).unwrap_or_else(|_| "{}".to_string());
        lines.extend(merged.lines().map(|l| format!("  {}", l)));

        lines.join("\n")
    }
}

/// One block per pattern, in merge order.
pub fn explain_report(report: &MatchReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Patterns: {} ({} matches)",
        report.len(),
        report.total_matches()
    ));

    for (index, matches) in report.iter() {
        lines.push(format!("  [{}] {}", index, matches.pattern));
        if matches.matched_names.is_empty() {
            lines.push("      (no matches)".to_string());
        }
        for name in &matches.matched_names {
            lines.push(format!("      {}", name));
        }
    }

    lines
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
