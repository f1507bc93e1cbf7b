//! vartools - pattern-driven variable merging
//!
//! Loads variable namespaces from TOML/JSON files, finds the variables whose
//! names match a list of regex patterns, and deep-merges their values in
//! pattern order. The engine itself lives in `vartools-merge`; this crate
//! adds file loading, request files, output rendering and the CLI.

pub mod namespace;
pub mod output;
pub mod request;

pub use namespace::{NamespaceError, NamespaceOrigin, NamespaceSet, NamespaceSource};
pub use output::LookupOutput;
pub use request::{RequestError, RequestFile};
pub use vartools_merge::{
    ErrorCode, ListMerge, LookupError, LookupRequest, MatchReport, MergeOptions, MergeResult,
};

use vartools_merge::{resolve_and_merge, Resolver, TemplateResolver, Verbatim};

/// Top-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("[{}] {}", .0.code(), .0)]
    Lookup(#[from] LookupError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// How values are resolved before merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Templating {
    /// Expand `{{ name }}` references, failing on undefined names
    #[default]
    Strict,
    /// Merge values as written
    Off,
}

/// Run a typed lookup over loaded namespaces.
pub fn lookup(
    set: &NamespaceSet,
    patterns: &[String],
    options: &MergeOptions,
    templating: Templating,
) -> Result<LookupOutput, Error> {
    let scope = set.scope();
    let result = match templating {
        Templating::Strict => resolve_and_merge(patterns, options, &scope, &TemplateResolver::new(scope))?,
        Templating::Off => resolve_and_merge(patterns, options, &scope, &Verbatim)?,
    };
    Ok(LookupOutput::new(result, set.sources.clone()))
}

/// Run an untyped request over loaded namespaces.
pub fn run_request(
    set: &NamespaceSet,
    request: &LookupRequest,
    templating: Templating,
) -> Result<LookupOutput, Error> {
    let scope = set.scope();
    let template = TemplateResolver::new(scope);
    let resolver: &dyn Resolver = match templating {
        Templating::Strict => &template,
        Templating::Off => &Verbatim,
    };
    let result = request.run(&scope, resolver)?;
    Ok(LookupOutput::new(result, set.sources.clone()))
}
