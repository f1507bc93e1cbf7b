//! Lookup request files
//!
//! A request file carries the pattern terms and the loose options, plus
//! optionally the namespace paths to load:
//!
//! ```toml
//! terms = ["^myval_.+", "^myvaldev_.+"]
//! vars = ["group_vars"]
//! context = ["host_vars/web1.toml"]
//!
//! [options]
//! list_merge = "append_rp"
//! ```
//!
//! Terms and options are kept untyped so that malformed entries are
//! reported by the lookup itself.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use vartools_merge::LookupRequest;

use crate::namespace::{read_value, relative_to, NamespaceError};

/// Request file errors
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Load(#[from] NamespaceError),

    #[error("Invalid request {path}: {message}")]
    Invalid { path: String, message: String },
}

/// A parsed request file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFile {
    pub request: LookupRequest,

    /// Base namespace paths, resolved against the request file's directory
    pub vars: Vec<PathBuf>,

    /// Context namespace paths, resolved likewise
    pub context: Vec<PathBuf>,
}

impl RequestFile {
    /// Read a `.toml` or `.json` request file.
    pub fn from_file(path: &Path) -> Result<Self, RequestError> {
        let (value, _digest) = read_value(path)?;
        Self::from_value(path, value)
    }

    /// Interpret an already-parsed request document.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, RequestError> {
        let invalid = |message: String| RequestError::Invalid {
            path: path.display().to_string(),
            message,
        };

        let Value::Object(mut doc) = value else {
            return Err(invalid("top level must be a table".to_string()));
        };

        let terms = match doc.remove("terms") {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(invalid(format!("'terms' must be an array, got {}", other))),
        };

        let options = match doc.remove("options") {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(invalid(format!("'options' must be a table, got {}", other)))
            }
        };

        let vars = path_list(doc.remove("vars"), "vars").map_err(&invalid)?;
        let context = path_list(doc.remove("context"), "context").map_err(&invalid)?;

        if let Some(key) = doc.keys().next() {
            return Err(invalid(format!("unknown request field '{}'", key)));
        }

        Ok(Self {
            request: LookupRequest::new(terms, options),
            vars: relative_to(path, &vars),
            context: relative_to(path, &context),
        })
    }
}

fn path_list(value: Option<Value>, field: &str) -> Result<Vec<PathBuf>, String> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![PathBuf::from(s)]),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(PathBuf::from(s)),
                other => Err(format!("'{}' entries must be strings, got {}", field, other)),
            })
            .collect(),
        Some(other) => Err(format!("'{}' must be a string or array, got {}", field, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_value() {
        let file = RequestFile::from_value(
            Path::new("/work/req.json"),
            json!({
                "terms": ["^a", 7],
                "options": {"recursive": false, "bogus": 1},
                "vars": "vars",
                "context": ["/etc/ctx.json"]
            }),
        )
        .unwrap();

        // malformed entries survive parsing untouched
        assert_eq!(file.request.terms, vec![json!("^a"), json!(7)]);
        assert_eq!(file.request.options["bogus"], json!(1));
        assert_eq!(file.vars, vec![PathBuf::from("/work/vars")]);
        assert_eq!(file.context, vec![PathBuf::from("/etc/ctx.json")]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RequestFile::from_value(Path::new("r.json"), json!({"pattern": "x"})).unwrap_err();
        assert!(err.to_string().contains("unknown request field 'pattern'"));
    }

    #[test]
    fn test_terms_must_be_array() {
        let err = RequestFile::from_value(Path::new("r.json"), json!({"terms": "x"})).unwrap_err();
        assert!(matches!(err, RequestError::Invalid { .. }));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lookup.toml");
        fs::write(
            &path,
            "terms = [\"^web_\"]\nvars = [\"vars\"]\n[options]\nlist_merge = \"append\"\n",
        )
        .unwrap();

        let file = RequestFile::from_file(&path).unwrap();
        assert_eq!(file.request.terms, vec![json!("^web_")]);
        assert_eq!(file.request.options["list_merge"], json!("append"));
        assert_eq!(file.vars, vec![dir.path().join("vars")]);
        assert!(file.context.is_empty());
    }
}
