//! Load-path registry.
//!
//! Maps a symbolic component type (`view`, `controller`, ...) to the
//! directory and file glob an autoloader uses to discover files of that
//! type. Extensions register their own types; the core knows none of them
//! in advance.
//!
//! # Design Decisions
//! - Keys are validated symbols; anything else fails at the call site
//! - Directories are not checked for existence
//! - Lookup of an unregistered type is an explicit `UnknownPathType` error,
//!   never an implicit default directory

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dashmap::DashMap;

use crate::error::{BootError, BootResult};
use crate::observability::metrics;

/// Glob used when a registration does not name one.
pub const DEFAULT_GLOB: &str = "**/*.rs";

/// Whether `s` is a symbolic identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A validated component type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathType(String);

impl PathType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PathType {
    type Err = BootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_symbol(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(BootError::InvalidArgument(format!(
                "path type `{s}` is not a symbolic identifier"
            )))
        }
    }
}

impl Borrow<str> for PathType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory and discovery glob for one component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub directory: PathBuf,
    pub glob: String,
}

/// Concurrent registry of component load paths.
#[derive(Debug, Default)]
pub struct PathRegistry {
    entries: DashMap<PathType, PathEntry>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directory` for `kind` with the default glob.
    pub fn register(&self, kind: &str, directory: impl Into<PathBuf>) -> BootResult<()> {
        self.register_with_glob(kind, directory, DEFAULT_GLOB)
    }

    /// Register `directory` and `glob` for `kind`, replacing any previous entry.
    pub fn register_with_glob(
        &self,
        kind: &str,
        directory: impl Into<PathBuf>,
        glob: impl Into<String>,
    ) -> BootResult<()> {
        let kind: PathType = kind.parse()?;
        let entry = PathEntry {
            directory: directory.into(),
            glob: glob.into(),
        };
        tracing::debug!(
            kind = %kind,
            directory = %entry.directory.display(),
            glob = %entry.glob,
            "Load path registered"
        );
        self.entries.insert(kind, entry);
        metrics::record_registration("path");
        Ok(())
    }

    /// Full entry for `kind`.
    pub fn get(&self, kind: &str) -> BootResult<PathEntry> {
        self.entries
            .get(kind)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BootError::UnknownPathType(kind.to_string()))
    }

    pub fn directory_for(&self, kind: &str) -> BootResult<PathBuf> {
        self.get(kind).map(|entry| entry.directory)
    }

    pub fn glob_for(&self, kind: &str) -> BootResult<String> {
        self.get(kind).map(|entry| entry.glob)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// All registrations, sorted by type name.
    pub fn entries(&self) -> Vec<(PathType, PathEntry)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a layout directory against the application root.
pub(crate) fn under_root(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let registry = PathRegistry::new();
        registry.register("view", "/app/views").unwrap();

        assert_eq!(registry.directory_for("view").unwrap(), PathBuf::from("/app/views"));
        assert_eq!(registry.glob_for("view").unwrap(), DEFAULT_GLOB);
    }

    #[test]
    fn test_explicit_glob() {
        let registry = PathRegistry::new();
        registry
            .register_with_glob("stylesheet", "public/css", "*.css")
            .unwrap();
        assert_eq!(registry.glob_for("stylesheet").unwrap(), "*.css");
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = PathRegistry::new();
        registry.register("model", "a").unwrap();
        registry.register_with_glob("model", "b", "*.m").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("model").unwrap(),
            PathEntry {
                directory: "b".into(),
                glob: "*.m".into()
            }
        );
    }

    #[test]
    fn test_invalid_type_fails_fast() {
        let registry = PathRegistry::new();
        for bad in ["", "app/views", "1st", "has space", "dash-ed"] {
            let err = registry.register(bad, "x").unwrap_err();
            assert!(matches!(err, BootError::InvalidArgument(_)), "{bad:?}");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let registry = PathRegistry::new();
        assert!(matches!(
            registry.directory_for("mailer"),
            Err(BootError::UnknownPathType(ref t)) if t == "mailer"
        ));
        assert!(matches!(
            registry.glob_for("mailer"),
            Err(BootError::UnknownPathType(_))
        ));
    }

    #[test]
    fn test_entries_sorted_and_clear() {
        let registry = PathRegistry::new();
        registry.register("view", "v").unwrap();
        registry.register("controller", "c").unwrap();

        let kinds: Vec<_> = registry
            .entries()
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(kinds, ["controller", "view"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("view"));
    }

    #[test]
    fn test_is_symbol() {
        assert!(is_symbol("view"));
        assert!(is_symbol("_private"));
        assert!(is_symbol("Mailer2"));
        assert!(!is_symbol("2fast"));
        assert!(!is_symbol("a.b"));
    }
}
