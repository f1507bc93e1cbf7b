//! Namespace loading
//!
//! Builds the base and context namespaces from files and directories:
//! 1. Base sources, in the order given
//! 2. Context sources, in the order given
//!
//! Within each namespace a later source replaces earlier variables of the
//! same name wholesale. Deep merging only happens at lookup time.

mod source;

pub use source::{
    load_dir, load_file, load_path, read_value, toml_to_json, FileFormat, NamespaceError,
    NamespaceOrigin, NamespaceSource,
};

use std::path::{Path, PathBuf};

use vartools_merge::{Namespace, VariableScope};

/// Loaded namespaces plus where they came from.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSet {
    base: Option<Namespace>,
    context: Option<Namespace>,

    /// Contributing files in load order
    pub sources: Vec<NamespaceSource>,
}

impl NamespaceSet {
    /// Load base and context namespaces.
    ///
    /// With no base paths the base namespace stays absent and lookups fail
    /// with `NamespaceUnavailable`.
    pub fn build<P, Q>(base_paths: &[P], context_paths: &[Q]) -> Result<Self, NamespaceError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let mut set = NamespaceSet::default();
        set.base = set.layer(base_paths, NamespaceOrigin::Base)?;
        set.context = set.layer(context_paths, NamespaceOrigin::Context)?;
        Ok(set)
    }

    /// Namespaces supplied directly, without provenance.
    pub fn from_namespaces(base: Option<Namespace>, context: Option<Namespace>) -> Self {
        Self {
            base,
            context,
            sources: Vec::new(),
        }
    }

    fn layer<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        origin: NamespaceOrigin,
    ) -> Result<Option<Namespace>, NamespaceError> {
        if paths.is_empty() {
            return Ok(None);
        }

        let mut namespace = Namespace::new();
        for path in paths {
            let (loaded, sources) = load_path(path.as_ref(), origin)?;
            namespace.extend(loaded);
            self.sources.extend(sources);
        }
        Ok(Some(namespace))
    }

    pub fn base(&self) -> Option<&Namespace> {
        self.base.as_ref()
    }

    pub fn context(&self) -> Option<&Namespace> {
        self.context.as_ref()
    }

    /// Borrowed scope for a lookup.
    pub fn scope(&self) -> VariableScope<'_> {
        VariableScope::from_parts(self.base.as_ref(), self.context.as_ref())
    }
}

/// Resolve relative request paths against the request file's directory.
pub fn relative_to(anchor: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    let dir = anchor.parent().unwrap_or_else(|| Path::new(""));
    paths
        .iter()
        .map(|p| if p.is_absolute() { p.clone() } else { dir.join(p) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_base_paths() {
        let set = NamespaceSet::build::<PathBuf, PathBuf>(&[], &[]).unwrap();
        assert!(set.base().is_none());
        assert!(set.scope().base().is_err());
    }

    #[test]
    fn test_base_and_context() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.toml");
        let overrides = dir.path().join("more.json");
        let context = dir.path().join("host.json");
        fs::write(&base, "[a]\nx = 1\n[b]\nx = 2\n").unwrap();
        fs::write(&overrides, r#"{"b": {"y": 3}}"#).unwrap();
        fs::write(&context, r#"{"a": {"x": 10}}"#).unwrap();

        let set = NamespaceSet::build(&[base, overrides], &[context]).unwrap();

        let base_ns = set.base().unwrap();
        assert_eq!(base_ns["b"], json!({"y": 3}));
        assert_eq!(set.scope().get("a"), Some(&json!({"x": 10})));
        assert_eq!(set.sources.len(), 3);
        assert_eq!(set.sources[2].origin, NamespaceOrigin::Context);
    }

    #[test]
    fn test_missing_file_fails() {
        let err = NamespaceSet::build(&[PathBuf::from("/definitely/not/here.toml")], &[] as &[PathBuf])
            .unwrap_err();
        assert!(matches!(err, NamespaceError::Io { .. }));
    }

    #[test]
    fn test_relative_to() {
        let resolved = relative_to(
            Path::new("/srv/req/lookup.toml"),
            &[PathBuf::from("vars"), PathBuf::from("/abs/ctx.json")],
        );
        assert_eq!(resolved[0], PathBuf::from("/srv/req/vars"));
        assert_eq!(resolved[1], PathBuf::from("/abs/ctx.json"));
    }
}
