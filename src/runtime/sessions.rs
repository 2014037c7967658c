//! Session-type registry.
//!
//! Session strategies register under a name together with the file that
//! implements them. Registration order is part of the contract: listings
//! (CLI help, diagnostics) show types in the order they were first
//! registered, so the canonical default stays first.

use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use serde::Serialize;

use crate::observability::metrics;

/// Metadata for one session type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTypeInfo {
    pub file: String,
    pub description: String,
}

/// Insertion-ordered registry of session types.
#[derive(Debug, Default)]
pub struct SessionTypeRegistry {
    types: RwLock<IndexMap<String, SessionTypeInfo>>,
}

impl SessionTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a session type.
    ///
    /// Re-registering replaces the metadata but keeps the original position.
    pub fn register(&self, name: &str, file: impl Into<String>, description: Option<&str>) {
        let info = SessionTypeInfo {
            file: file.into(),
            description: description
                .map(str::to_string)
                .unwrap_or_else(|| format!("Using {name} sessions")),
        };
        tracing::debug!(name, file = %info.file, "Session type registered");
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), info);
        metrics::record_registration("session_type");
    }

    pub fn get(&self, name: &str) -> Option<SessionTypeInfo> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// All registrations in first-registration order.
    pub fn list(&self) -> Vec<(String, SessionTypeInfo)> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, info)| (name.clone(), info.clone()))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
