//! Template registry: short names for template documents.
//!
//! [`RegistryStore`] handles the "how" of persistence (file vs memory), while
//! [`TemplateRegistry`] handles the "what": validation, lookups and ordering.
//! The whole map is loaded once at construction and written back after every change.

use crate::error::{RegistryError, Result};
use std::collections::BTreeMap;

pub mod fs;
pub mod memory;

/// Template name to document id, ordered by name.
pub type RegistryMap = BTreeMap<String, String>;

pub trait RegistryStore {
    /// Load the full map. A store that has never been written yields an empty map.
    fn load(&self) -> Result<RegistryMap>;

    /// Replace the stored map. MUST be atomic.
    fn save(&self, map: &RegistryMap) -> Result<()>;
}

pub struct TemplateRegistry<S: RegistryStore> {
    store: S,
    entries: RegistryMap,
}

impl<S: RegistryStore> TemplateRegistry<S> {
    pub fn open(store: S) -> Result<Self> {
        let entries = store.load()?;
        tracing::debug!(count = entries.len(), "loaded template registry");
        Ok(Self { store, entries })
    }

    /// Open `store`, starting empty if it cannot be read.
    pub fn open_or_empty(store: S) -> Self {
        let entries = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "template registry unavailable, names will not resolve");
            RegistryMap::new()
        });
        Self { store, entries }
    }

    /// Register (or re-point) `name`. Returns the doc id it replaced, if any.
    pub fn register(&mut self, name: &str, doc_id: &str) -> Result<Option<String>> {
        if name.trim().is_empty() {
            return Err(RegistryError::Invalid("template name must not be empty".to_string()).into());
        }
        if doc_id.trim().is_empty() {
            return Err(RegistryError::Invalid(format!(
                "document id for template '{}' must not be empty",
                name
            ))
            .into());
        }

        let previous = self.entries.insert(name.to_string(), doc_id.to_string());
        self.store.save(&self.entries)?;
        Ok(previous)
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Like [`lookup`](Self::lookup), but a miss is an error naming the template.
    pub fn doc_id(&self, name: &str) -> Result<&str> {
        self.lookup(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()).into())
    }

    /// Forget `name`, returning the doc id it pointed at.
    pub fn remove(&mut self, name: &str) -> Result<String> {
        let removed = self.doc_id(name)?.to_string();
        self.entries.remove(name);
        self.store.save(&self.entries)?;
        Ok(removed)
    }

    /// All entries, sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|(name, doc_id)| (name.as_str(), doc_id.as_str()))
            .collect()
    }
}
