//! Filesystem-based template overrides.
//!
//! Reads per-kind template files from a directory and registers them in an
//! [`InMemoryTemplateStore`], replacing the built-in text for those kinds.
//! Kinds without an override keep their built-in template.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── templates.toml           ← optional manifest
//! ├── model.tpl                ← one file per overridden kind
//! ├── controller.tpl
//! └── schema-script.tpl
//! ```
//!
//! File stems are parsed with [`ArtifactKind::from_str`], so aliases such as
//! `pom.tpl` or `schema.tpl` work too.
//!
//! # `templates.toml` format
//!
//! ```toml
//! [files]
//! model = "jpa/Entity.java.tpl"   # kind = path relative to the directory
//! build-descriptor = "maven/pom.xml.tpl"
//! ```
//!
//! Manifest entries win over a discovered `<kind>.tpl` for the same kind.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use entigen_core::{domain::ArtifactKind, error::{EntigenError, EntigenResult}};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::template_store::InMemoryTemplateStore;

/// Extension of template override files.
pub const TEMPLATE_EXTENSION: &str = "tpl";

/// Name of the optional manifest inside the templates directory.
pub const MANIFEST_FILE: &str = "templates.toml";

/// Deserialised `templates.toml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct TemplateManifest {
    /// Kind name → template path relative to the templates directory.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// Loads `<kind>.tpl` overrides from one directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateLoader {
    dir: PathBuf,
}

impl DirectoryTemplateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read every override in the directory.
    ///
    /// # Errors
    ///
    /// `Configuration` when the directory is missing or unreadable, when the
    /// manifest is malformed or names an unknown kind, or when a template
    /// file cannot be read. Unrecognised `.tpl` stems are skipped with a
    /// warning.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn load(&self) -> EntigenResult<BTreeMap<ArtifactKind, String>> {
        if !self.dir.is_dir() {
            return Err(config_error(format!(
                "templates directory not found: {}",
                self.dir.display()
            )));
        }

        let mut templates = BTreeMap::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                config_error(format!("failed to read templates directory: {e}"))
            })?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match ArtifactKind::from_str(stem) {
                Ok(kind) => {
                    templates.insert(kind, read_template(path)?);
                    debug!(%kind, file = %path.display(), "Loaded template override");
                }
                Err(_) => {
                    warn!(file = %path.display(), "Skipping template with unknown kind");
                }
            }
        }

        if let Some(manifest) = self.read_manifest()? {
            for (name, file) in manifest.files {
                let kind = ArtifactKind::from_str(&name).map_err(|_| {
                    config_error(format!("{MANIFEST_FILE}: unknown artifact kind '{name}'"))
                })?;
                let path = self.dir.join(&file);
                templates.insert(kind, read_template(&path)?);
                debug!(%kind, file = %path.display(), "Loaded template from manifest");
            }
        }

        debug!(count = templates.len(), "Finished loading template overrides");
        Ok(templates)
    }

    /// Load the overrides into `store`, returning the kinds replaced.
    pub fn load_into(&self, store: &InMemoryTemplateStore) -> EntigenResult<Vec<ArtifactKind>> {
        let templates = self.load()?;
        let kinds = templates.keys().copied().collect();
        for (kind, text) in templates {
            store.insert(kind, text)?;
        }
        Ok(kinds)
    }

    fn read_manifest(&self) -> EntigenResult<Option<TemplateManifest>> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| config_error(format!("failed to read '{}': {e}", path.display())))?;

        toml::from_str(&raw)
            .map(Some)
            .map_err(|e| config_error(format!("failed to parse '{}': {e}", path.display())))
    }
}

fn read_template(path: &Path) -> EntigenResult<String> {
    fs::read_to_string(path)
        .map_err(|e| config_error(format!("failed to read template '{}': {e}", path.display())))
}

fn config_error(message: String) -> EntigenError {
    EntigenError::Configuration { message }
}
