//! Value lookup and filtering.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{LookupError, LookupResult};
use crate::scope::VariableScope;
use crate::template::Resolver;

/// Fetch the value for every name, keeping only mappings.
///
/// Names are looked up context-first. A name missing from both namespaces
/// is an error; a value that is not a mapping is skipped. Each mapping is
/// resolved strictly through `resolver`. The result always starts with an
/// empty mapping.
pub fn collect_values<R>(
    names: &[String],
    scope: &VariableScope<'_>,
    resolver: &R,
) -> LookupResult<Vec<Map<String, Value>>>
where
    R: Resolver + ?Sized,
{
    let mut values = Vec::with_capacity(names.len() + 1);
    values.push(Map::new());

    for name in names {
        let raw = scope
            .get(name)
            .ok_or_else(|| LookupError::MissingVariable(name.clone()))?;

        if !raw.is_object() {
            debug!(name = %name, "skipping non-mapping value");
            continue;
        }

        let resolved = resolver
            .resolve(raw, true)
            .map_err(|source| LookupError::Resolution {
                name: name.clone(),
                source,
            })?;

        match resolved {
            Value::Object(map) => values.push(map),
            _ => debug!(name = %name, "skipping value that resolved to a non-mapping"),
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Namespace;
    use crate::template::{ResolutionError, TemplateResolver, Verbatim};
    use serde_json::json;

    fn ns(value: Value) -> Namespace {
        value.as_object().cloned().unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seeded_with_empty_mapping() {
        let base = ns(json!({}));
        let values = collect_values(&[], &VariableScope::new(&base), &Verbatim).unwrap();
        assert_eq!(values, vec![Map::new()]);
    }

    #[test]
    fn test_non_mappings_skipped() {
        let base = ns(json!({"a": {"x": 1}, "s": "scalar", "l": [1], "n": null}));
        let values = collect_values(
            &names(&["a", "s", "l", "n"]),
            &VariableScope::new(&base),
            &Verbatim,
        )
        .unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(Value::Object(values[1].clone()), json!({"x": 1}));
    }

    #[test]
    fn test_context_value_preferred() {
        let base = ns(json!({"a": {"src": "base"}}));
        let context = ns(json!({"a": {"src": "context"}}));
        let scope = VariableScope::new(&base).with_context(&context);

        let values = collect_values(&names(&["a"]), &scope, &Verbatim).unwrap();
        assert_eq!(values[1]["src"], json!("context"));
    }

    #[test]
    fn test_context_shadow_can_hide_mapping() {
        let base = ns(json!({"a": {"src": "base"}}));
        let context = ns(json!({"a": "flat"}));
        let scope = VariableScope::new(&base).with_context(&context);

        let values = collect_values(&names(&["a"]), &scope, &Verbatim).unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_duplicates_preserved() {
        let base = ns(json!({"a": {"x": 1}}));
        let values =
            collect_values(&names(&["a", "a"]), &VariableScope::new(&base), &Verbatim).unwrap();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_missing_variable_is_error() {
        let base = ns(json!({"a": {}}));
        let err = collect_values(&names(&["gone"]), &VariableScope::new(&base), &Verbatim)
            .unwrap_err();
        assert!(matches!(err, LookupError::MissingVariable(ref n) if n == "gone"));
    }

    #[test]
    fn test_values_resolved_strictly() {
        let base = ns(json!({"cfg": {"url": "http://{{ host }}"}, "host": "web1"}));
        let scope = VariableScope::new(&base);
        let resolver = TemplateResolver::new(scope);

        let values = collect_values(&names(&["cfg"]), &scope, &resolver).unwrap();
        assert_eq!(values[1]["url"], json!("http://web1"));
    }

    #[test]
    fn test_unresolved_reference_is_error() {
        let base = ns(json!({"cfg": {"url": "{{ nowhere }}"}}));
        let scope = VariableScope::new(&base);
        let resolver = TemplateResolver::new(scope);

        let err = collect_values(&names(&["cfg"]), &scope, &resolver).unwrap_err();
        match err {
            LookupError::Resolution { name, source } => {
                assert_eq!(name, "cfg");
                assert_eq!(source, ResolutionError::Undefined("nowhere".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_reference_in_skipped_value_ignored() {
        let base = ns(json!({"s": "{{ nowhere }}"}));
        let scope = VariableScope::new(&base);
        let resolver = TemplateResolver::new(scope);

        assert!(collect_values(&names(&["s"]), &scope, &resolver).is_ok());
    }
}
