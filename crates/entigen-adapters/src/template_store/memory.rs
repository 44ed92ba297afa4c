//! In-memory template store with built-in templates.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use entigen_core::{
    application::ApplicationError, domain::ArtifactKind, error::EntigenResult,
};

use crate::builtin_templates;

/// Thread-safe map from artifact kind to template text.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    inner: Arc<RwLock<HashMap<ArtifactKind, String>>>,
}

impl InMemoryTemplateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the built-in templates loaded.
    pub fn with_builtin() -> EntigenResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load (or reset to) the built-in templates.
    pub fn load_builtin(&self) -> EntigenResult<()> {
        for (kind, text) in builtin_templates::all_templates() {
            self.insert(kind, text)?;
        }
        Ok(())
    }

    /// Insert or replace the template for `kind`.
    pub fn insert(&self, kind: ArtifactKind, template: impl Into<String>) -> EntigenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(kind, template.into());
        Ok(())
    }

    /// Template text for `kind`.
    ///
    /// # Errors
    ///
    /// `TemplateMissing` naming the kind when nothing is registered.
    pub fn get(&self, kind: ArtifactKind) -> EntigenResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .get(&kind)
            .cloned()
            .ok_or_else(|| ApplicationError::TemplateMissing { kind }.into())
    }

    pub fn remove(&self, kind: ArtifactKind) -> EntigenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.remove(&kind);
        Ok(())
    }

    /// Registered kinds, in rendering order.
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        ArtifactKind::ALL
            .into_iter()
            .filter(|k| inner.contains_key(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
