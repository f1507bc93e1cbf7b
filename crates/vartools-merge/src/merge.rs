//! Recursive mapping merge.
//!
//! - Mappings: deep-merge by key when `recursive`, otherwise last wins
//! - Sequences: governed by [`ListMerge`]
//! - Scalars and mismatched types: last wins

use serde_json::{Map, Value};

use crate::options::ListMerge;

/// Fold `values` left to right into a single mapping, starting from `{}`.
pub fn combine<I>(values: I, recursive: bool, list_merge: ListMerge) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    values
        .into_iter()
        .fold(Map::new(), |acc, next| merge_maps(acc, next, recursive, list_merge))
}

/// Merge `overlay` into `base`; keys of `overlay` take precedence.
pub fn merge_maps(
    mut base: Map<String, Value>,
    overlay: Map<String, Value>,
    recursive: bool,
    list_merge: ListMerge,
) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => merge_values(base_value, overlay_value, recursive, list_merge),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

fn merge_values(base: Value, overlay: Value, recursive: bool, list_merge: ListMerge) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) if recursive => {
            Value::Object(merge_maps(base_map, overlay_map, recursive, list_merge))
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            Value::Array(merge_lists(base_items, overlay_items, list_merge))
        }
        (_, overlay) => overlay,
    }
}

/// Combine two sequences under the given policy.
pub fn merge_lists(base: Vec<Value>, overlay: Vec<Value>, list_merge: ListMerge) -> Vec<Value> {
    match list_merge {
        ListMerge::Replace => overlay,
        ListMerge::Keep => base,
        ListMerge::Append => concat(base, overlay),
        ListMerge::Prepend => concat(overlay, base),
        ListMerge::AppendRp => {
            let rest = without(base, &overlay);
            concat(rest, overlay)
        }
        ListMerge::PrependRp => {
            let rest = without(base, &overlay);
            concat(overlay, rest)
        }
    }
}

fn concat(mut first: Vec<Value>, second: Vec<Value>) -> Vec<Value> {
    first.extend(second);
    first
}

/// Items of `base` that do not occur in `overlay`, in order. Repeats within
/// `base` survive.
// Value is not Hash, so this is quadratic; lists here are short.
fn without(base: Vec<Value>, overlay: &[Value]) -> Vec<Value> {
    base.into_iter().filter(|item| !overlay.contains(item)).collect()
}
