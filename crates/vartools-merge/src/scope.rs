//! The two namespaces a lookup reads from.

use serde_json::{Map, Value};

use crate::error::{LookupError, LookupResult};

/// A flat mapping from variable name to value.
pub type Namespace = Map<String, Value>;

/// Borrowed view over the base namespace and an optional context override.
///
/// Names are always discovered in the base namespace; values are read from
/// the context first and fall back to the base.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableScope<'a> {
    base: Option<&'a Namespace>,
    context: Option<&'a Namespace>,
}

impl<'a> VariableScope<'a> {
    pub fn new(base: &'a Namespace) -> Self {
        Self {
            base: Some(base),
            context: None,
        }
    }

    /// Scope with no namespaces at all; lookups fail with
    /// [`LookupError::NamespaceUnavailable`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(base: Option<&'a Namespace>, context: Option<&'a Namespace>) -> Self {
        Self { base, context }
    }

    pub fn with_context(mut self, context: &'a Namespace) -> Self {
        self.context = Some(context);
        self
    }

    /// The base namespace, or an error if none was supplied.
    pub fn base(&self) -> LookupResult<&'a Namespace> {
        self.base.ok_or(LookupError::NamespaceUnavailable)
    }

    pub fn context(&self) -> Option<&'a Namespace> {
        self.context
    }

    /// Context-first lookup.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.context
            .and_then(|ctx| ctx.get(name))
            .or_else(|| self.base.and_then(|base| base.get(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ns(value: Value) -> Namespace {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_context_takes_priority() {
        let base = ns(json!({"a": 1, "b": 2}));
        let context = ns(json!({"a": 10}));
        let scope = VariableScope::new(&base).with_context(&context);

        assert_eq!(scope.get("a"), Some(&json!(10)));
        assert_eq!(scope.get("b"), Some(&json!(2)));
        assert_eq!(scope.get("c"), None);
    }

    #[test]
    fn test_missing_base() {
        let scope = VariableScope::empty();
        assert!(matches!(scope.base(), Err(LookupError::NamespaceUnavailable)));
        assert_eq!(scope.get("a"), None);
    }
}
