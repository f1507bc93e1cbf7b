//! Deferred value resolution.
//!
//! Variable values may carry `{{ name }}` references to other variables.
//! A [`Resolver`] turns a raw value into its resolved form before merging.

use serde_json::{Map, Value};

use crate::scope::VariableScope;

/// Maximum nesting of references before a value is considered recursive.
pub const MAX_TEMPLATE_DEPTH: usize = 32;

/// Maximum number of reference lookups in one [`Resolver::resolve`] call.
pub const MAX_TEMPLATE_EXPANSIONS: usize = 10_000;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Failure to resolve a templated value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("'{0}' is undefined")]
    Undefined(String),

    #[error("unterminated reference in \"{0}\"")]
    Unterminated(String),

    #[error("empty reference in \"{0}\"")]
    EmptyReference(String),

    #[error("recursive reference detected while resolving '{0}'")]
    TooDeep(String),

    #[error("too many references expanded while resolving '{0}'")]
    TooManyExpansions(String),
}

/// Resolves deferred content inside a value.
pub trait Resolver {
    /// Resolve `value`. With `strict`, any unresolved reference is an error.
    fn resolve(&self, value: &Value, strict: bool) -> Result<Value, ResolutionError>;
}

/// Returns values unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Resolver for Verbatim {
    fn resolve(&self, value: &Value, _strict: bool) -> Result<Value, ResolutionError> {
        Ok(value.clone())
    }
}

/// Expands `{{ name }}` / `{{ name.key.0 }}` references against a scope.
///
/// A string consisting of exactly one reference becomes the referenced
/// value with its type intact. Embedded references are rendered into the
/// surrounding text: strings verbatim, everything else as compact JSON.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    scope: VariableScope<'a>,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(scope: VariableScope<'a>) -> Self {
        Self { scope }
    }

    fn resolve_value(
        &self,
        value: &Value,
        strict: bool,
        depth: usize,
        budget: &mut usize,
    ) -> Result<Value, ResolutionError> {
        match value {
            Value::String(text) => self.resolve_string(text, strict, depth, budget),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, strict, depth, budget))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut resolved = Map::with_capacity(map.len());
                for (key, item) in map {
                    resolved.insert(key.clone(), self.resolve_value(item, strict, depth, budget)?);
                }
                Ok(Value::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(
        &self,
        text: &str,
        strict: bool,
        depth: usize,
        budget: &mut usize,
    ) -> Result<Value, ResolutionError> {
        if !text.contains(OPEN) {
            return Ok(Value::String(text.to_string()));
        }

        // A lone reference keeps the referenced value's type.
        let trimmed = text.trim();
        if let Some(inner) = trimmed
            .strip_prefix(OPEN)
            .and_then(|rest| rest.strip_suffix(CLOSE))
        {
            if !inner.contains(OPEN) && !inner.contains(CLOSE) {
                let path = inner.trim();
                if path.is_empty() {
                    return if strict {
                        Err(ResolutionError::EmptyReference(text.to_string()))
                    } else {
                        Ok(Value::String(text.to_string()))
                    };
                }
                return match self.lookup(path, strict, depth, budget)? {
                    Some(value) => Ok(value),
                    None => Ok(Value::String(text.to_string())),
                };
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                if strict {
                    return Err(ResolutionError::Unterminated(text.to_string()));
                }
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let raw = &after[..end];
            let path = raw.trim();
            if path.is_empty() {
                if strict {
                    return Err(ResolutionError::EmptyReference(text.to_string()));
                }
                out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]);
            } else {
                match self.lookup(path, strict, depth, budget)? {
                    Some(Value::String(s)) => out.push_str(&s),
                    Some(other) => out.push_str(&other.to_string()),
                    None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
                }
            }
            rest = &after[end + CLOSE.len()..];
        }
        out.push_str(rest);

        Ok(Value::String(out))
    }

    /// Look up a dotted path; `Ok(None)` only when non-strict and undefined.
    ///
    /// Every lookup spends one unit of `budget`, so references that fan out
    /// at each level fail once the budget is gone instead of expanding
    /// exponentially.
    fn lookup(
        &self,
        path: &str,
        strict: bool,
        depth: usize,
        budget: &mut usize,
    ) -> Result<Option<Value>, ResolutionError> {
        if depth >= MAX_TEMPLATE_DEPTH {
            return Err(ResolutionError::TooDeep(path.to_string()));
        }
        if *budget == 0 {
            return Err(ResolutionError::TooManyExpansions(path.to_string()));
        }
        *budget -= 1;

        let mut segments = path.split('.').map(str::trim);
        let found = segments.next().and_then(|name| self.scope.get(name)).and_then(|root| {
            segments.try_fold(root, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
        });

        match found {
            Some(value) => self.resolve_value(value, strict, depth + 1, budget).map(Some),
            None if strict => Err(ResolutionError::Undefined(path.to_string())),
            None => Ok(None),
        }
    }
}

impl Resolver for TemplateResolver<'_> {
    fn resolve(&self, value: &Value, strict: bool) -> Result<Value, ResolutionError> {
        let mut budget = MAX_TEMPLATE_EXPANSIONS;
        self.resolve_value(value, strict, 0, &mut budget)
    }
}
