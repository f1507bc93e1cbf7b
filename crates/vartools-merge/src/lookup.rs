//! End-to-end lookup: generate patterns, match names, fetch values, merge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LookupResult;
use crate::merge::combine;
use crate::names::{resolve_names, resolve_terms};
use crate::options::MergeOptions;
use crate::patterns::expand_patterns;
use crate::report::MergeResult;
use crate::scope::VariableScope;
use crate::template::Resolver;
use crate::values::collect_values;

/// Run a lookup with typed inputs.
///
/// The base namespace is rescanned on every call.
pub fn resolve_and_merge<R>(
    patterns: &[String],
    options: &MergeOptions,
    scope: &VariableScope<'_>,
    resolver: &R,
) -> LookupResult<MergeResult>
where
    R: Resolver + ?Sized,
{
    let base = scope.base()?;

    let patterns = expand_patterns(options, patterns);
    let (names, report) = resolve_names(&patterns, base)?;
    let values = collect_values(&names, scope, resolver)?;

    debug!(
        patterns = patterns.len(),
        names = names.len(),
        mappings = values.len() - 1,
        list_merge = %options.list_merge,
        recursive = options.recursive,
        "merging variables"
    );

    let merged = combine(values, options.recursive, options.list_merge);
    Ok(MergeResult { merged, report })
}

/// An untyped lookup request, as read from a request file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Pattern entries; each must be a string.
    #[serde(default)]
    pub terms: Vec<Value>,

    /// Loose options; only the four known names are accepted.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl LookupRequest {
    pub fn new(terms: Vec<Value>, options: Map<String, Value>) -> Self {
        Self { terms, options }
    }

    /// Validate and run the request.
    ///
    /// Checks happen in order: namespace, options, pattern entries. Nothing
    /// is scanned until all of them pass.
    pub fn run<R>(&self, scope: &VariableScope<'_>, resolver: &R) -> LookupResult<MergeResult>
    where
        R: Resolver + ?Sized,
    {
        scope.base()?;
        let options = MergeOptions::from_map(&self.options)?;
        let patterns = resolve_terms(&self.terms)?;
        resolve_and_merge(&patterns, &options, scope, resolver)
    }
}
