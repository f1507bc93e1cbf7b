//! Loading a single namespace file or directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;
use vartools_merge::Namespace;
use walkdir::WalkDir;

/// Which namespace a source feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceOrigin {
    Base,
    Context,
}

/// A contributing file with provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceSource {
    /// Namespace this file contributed to
    pub origin: NamespaceOrigin,

    /// File path
    pub path: String,

    /// SHA-256 digest of raw file bytes
    pub digest: String,
}

/// Namespace loading errors
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("{0}: top level must be a table of variables")]
    NotATable(String),

    #[error("{0}: unsupported file type (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Failed to walk {path}: {message}")]
    Walk { path: String, message: String },
}

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(FileFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Read and parse a file, returning its top-level value and digest.
pub fn read_value(path: &Path) -> Result<(Value, String), NamespaceError> {
    let display = path.display().to_string();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| NamespaceError::UnsupportedFormat(display.clone()))?;

    let bytes = fs::read(path).map_err(|source| NamespaceError::Io {
        path: display.clone(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| NamespaceError::Parse {
        path: display.clone(),
        message: format!("Invalid UTF-8: {}", e),
    })?;

    let value = match format {
        FileFormat::Toml => {
            let table: toml::Value = toml::from_str(&contents).map_err(|e| NamespaceError::Parse {
                path: display.clone(),
                message: format!("TOML parse error: {}", e),
            })?;
            toml_to_json(table)
        }
        FileFormat::Json => serde_json::from_str(&contents).map_err(|e| NamespaceError::Parse {
            path: display.clone(),
            message: format!("JSON parse error: {}", e),
        })?,
    };

    Ok((value, digest))
}

/// Load one namespace file. The top level must be a table.
pub fn load_file(
    path: &Path,
    origin: NamespaceOrigin,
) -> Result<(Namespace, NamespaceSource), NamespaceError> {
    let (value, digest) = read_value(path)?;
    let path_str = path.display().to_string();

    let Value::Object(namespace) = value else {
        return Err(NamespaceError::NotATable(path_str));
    };

    debug!(path = %path_str, variables = namespace.len(), "loaded namespace file");

    Ok((
        namespace,
        NamespaceSource {
            origin,
            path: path_str,
            digest,
        },
    ))
}

/// Load every `.toml`/`.json` file below `dir`, in file-name order.
///
/// Later files replace earlier variables of the same name.
pub fn load_dir(
    dir: &Path,
    origin: NamespaceOrigin,
) -> Result<(Namespace, Vec<NamespaceSource>), NamespaceError> {
    let mut namespace = Namespace::new();
    let mut sources = Vec::new();

    for path in namespace_files(dir)? {
        let (loaded, source) = load_file(&path, origin)?;
        namespace.extend(loaded);
        sources.push(source);
    }

    Ok((namespace, sources))
}

/// Load a file or directory.
pub fn load_path(
    path: &Path,
    origin: NamespaceOrigin,
) -> Result<(Namespace, Vec<NamespaceSource>), NamespaceError> {
    if path.is_dir() {
        load_dir(path, origin)
    } else {
        let (namespace, source) = load_file(path, origin)?;
        Ok((namespace, vec![source]))
    }
}

fn namespace_files(dir: &Path) -> Result<Vec<PathBuf>, NamespaceError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| NamespaceError::Walk {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && FileFormat::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Convert a TOML value to JSON.
pub fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}
