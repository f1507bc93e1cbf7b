//! Find variables whose names match regex patterns, sort them and merge
//! their mapping values recursively.
//!
//! The matches for each pattern are sorted and appended to a single list;
//! the values behind those names are merged in that order, last value
//! wins. Only mapping values take part in the merge.

mod error;
mod lookup;
mod merge;
mod names;
mod options;
mod patterns;
mod report;
mod scope;
mod template;
mod values;

pub use error::{ErrorCode, LookupError, LookupResult};
pub use lookup::{resolve_and_merge, LookupRequest};
pub use merge::{combine, merge_lists, merge_maps};
pub use names::{compile, matching_names, resolve_names, resolve_terms};
pub use options::{ListMerge, MergeOptions, OPTION_NAMES};
pub use patterns::{default_patterns, expand_patterns, legacy_patterns, DEFAULT_CATEGORIES, LEGACY_PREFIXES};
pub use report::{MatchReport, MergeResult, PatternMatches};
pub use scope::{Namespace, VariableScope};
pub use template::{
    ResolutionError, Resolver, TemplateResolver, Verbatim, MAX_TEMPLATE_DEPTH, MAX_TEMPLATE_EXPANSIONS,
};
pub use values::collect_values;
