//! Typed lookup options.
//!
//! Options arrive either as a typed [`MergeOptions`] or as a loose map from
//! a request file. The loose form is validated up front: any key outside
//! [`OPTION_NAMES`] is rejected before any other work happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LookupError, LookupResult};

/// The only option names accepted by a lookup.
pub const OPTION_NAMES: &[&str] = &["list_merge", "recursive", "legacy", "default"];

/// How two sequences under the same key are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMerge {
    /// The incoming sequence replaces the existing one.
    #[default]
    Replace,
    /// The existing sequence is kept.
    Keep,
    /// Existing followed by incoming.
    Append,
    /// Incoming followed by existing.
    Prepend,
    /// Like `Append`, but base items also present in the overlay are dropped.
    AppendRp,
    /// Like `Prepend`, but base items also present in the overlay are dropped.
    PrependRp,
}

impl ListMerge {
    /// All policies, in documentation order.
    pub const ALL: [ListMerge; 6] = [
        ListMerge::Replace,
        ListMerge::Keep,
        ListMerge::Append,
        ListMerge::Prepend,
        ListMerge::AppendRp,
        ListMerge::PrependRp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListMerge::Replace => "replace",
            ListMerge::Keep => "keep",
            ListMerge::Append => "append",
            ListMerge::Prepend => "prepend",
            ListMerge::AppendRp => "append_rp",
            ListMerge::PrependRp => "prepend_rp",
        }
    }
}

impl fmt::Display for ListMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListMerge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListMerge::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ListMerge::ALL.iter().map(|p| p.as_str()).collect();
                format!(
                    "'list_merge' must be one of {}, got '{}'",
                    names.join(", "),
                    s
                )
            })
    }
}

/// Options controlling pattern generation and merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOptions {
    /// List merge policy (default: replace).
    #[serde(default)]
    pub list_merge: ListMerge,

    /// Merge nested mappings recursively (default: true).
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Identifier for the legacy `d_`/`a_`/`g_`/`h_` prefix scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy: Option<String>,

    /// Identifier for the `<id>_d`/`<id>_a`/... suffix scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn default_recursive() -> bool {
    true
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            list_merge: ListMerge::Replace,
            recursive: true,
            legacy: None,
            default: None,
        }
    }
}

impl MergeOptions {
    /// Build options from a loose key/value map.
    ///
    /// Unknown keys, badly typed values and unknown list policies are all
    /// reported as [`LookupError::InvalidOption`].
    pub fn from_map(map: &Map<String, Value>) -> LookupResult<Self> {
        let mut unknown: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|key| !OPTION_NAMES.contains(key))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(invalid_option(format!(
                "unknown option(s) {}",
                unknown
                    .iter()
                    .map(|k| format!("'{}'", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut options = MergeOptions::default();

        if let Some(value) = map.get("list_merge") {
            let text = value
                .as_str()
                .ok_or_else(|| invalid_option(format!("'list_merge' must be a string, got {}", value)))?;
            options.list_merge = text.parse().map_err(invalid_option)?;
        }

        if let Some(value) = map.get("recursive") {
            options.recursive = value
                .as_bool()
                .ok_or_else(|| invalid_option(format!("'recursive' must be a boolean, got {}", value)))?;
        }

        options.legacy = optional_identifier(map, "legacy")?;
        options.default = optional_identifier(map, "default")?;

        Ok(options)
    }

    pub fn with_list_merge(mut self, list_merge: ListMerge) -> Self {
        self.list_merge = list_merge;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_legacy(mut self, legacy: impl Into<String>) -> Self {
        self.legacy = Some(legacy.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

// null is treated as absent
fn optional_identifier(map: &Map<String, Value>, key: &str) -> LookupResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid_option(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

fn invalid_option(message: String) -> LookupError {
    LookupError::InvalidOption {
        message,
        valid: OPTION_NAMES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = MergeOptions::default();
        assert_eq!(options.list_merge, ListMerge::Replace);
        assert!(options.recursive);
        assert!(options.legacy.is_none());
        assert!(options.default.is_none());
    }

    #[test]
    fn test_from_empty_map() {
        let options = MergeOptions::from_map(&Map::new()).unwrap();
        assert_eq!(options, MergeOptions::default());
    }

    #[test]
    fn test_from_map_all_fields() {
        let options = MergeOptions::from_map(&map(json!({
            "list_merge": "append_rp",
            "recursive": false,
            "legacy": "web",
            "default": "db"
        })))
        .unwrap();

        assert_eq!(options.list_merge, ListMerge::AppendRp);
        assert!(!options.recursive);
        assert_eq!(options.legacy.as_deref(), Some("web"));
        assert_eq!(options.default.as_deref(), Some("db"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = MergeOptions::from_map(&map(json!({"foo": 1}))).unwrap_err();
        assert!(matches!(err, LookupError::InvalidOption { .. }));
        let msg = err.to_string();
        assert!(msg.contains("'foo'"));
        assert!(msg.contains("list_merge, recursive, legacy, default"));
    }

    #[test]
    fn test_unknown_list_policy_rejected() {
        let err = MergeOptions::from_map(&map(json!({"list_merge": "zip"}))).unwrap_err();
        assert!(matches!(err, LookupError::InvalidOption { .. }));
        assert!(err.to_string().contains("'zip'"));
    }

    #[test]
    fn test_badly_typed_recursive_rejected() {
        let err = MergeOptions::from_map(&map(json!({"recursive": "yes"}))).unwrap_err();
        assert!(matches!(err, LookupError::InvalidOption { .. }));
    }

    #[test]
    fn test_null_identifier_is_absent() {
        let options = MergeOptions::from_map(&map(json!({"legacy": null}))).unwrap();
        assert!(options.legacy.is_none());
    }

    #[test]
    fn test_list_merge_round_trip_names() {
        for policy in ListMerge::ALL {
            assert_eq!(policy.as_str().parse::<ListMerge>().unwrap(), policy);
        }
    }

    #[test]
    fn test_serde_rejects_unknown_fields() {
        let result: Result<MergeOptions, _> = serde_json::from_value(json!({"bogus": true}));
        assert!(result.is_err());

        let parsed: MergeOptions = serde_json::from_value(json!({"list_merge": "prepend"})).unwrap();
        assert_eq!(parsed.list_merge, ListMerge::Prepend);
        assert!(parsed.recursive);
    }
}
