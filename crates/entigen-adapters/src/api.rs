//! Helpers for an HTTP front end.
//!
//! Request validation, error bodies and archive downloads, expressed without
//! tying the crate to a web framework. A handler calls these and maps the
//! results onto its own response type.

use std::{
    fs,
    io,
    path::{Component, Path},
};

use chrono::{DateTime, Utc};
use entigen_core::{
    application::ApplicationError,
    domain::{DomainError, GenerationRequest},
    error::{EntigenError, EntigenResult},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Content type for archive downloads.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/octet-stream";

/// Shape checks applied before a request reaches the pipeline.
///
/// Rejects an empty class name, an empty field list and any field without a
/// name. Deeper checks (qualified name segments, duplicates, primary keys)
/// happen in the pipeline.
pub fn validate_incoming(request: &GenerationRequest) -> EntigenResult<()> {
    let entity = &request.entity;

    if entity.qualified_name.trim().is_empty() {
        return Err(DomainError::EmptyClassName.into());
    }
    if entity.fields.is_empty() {
        return Err(DomainError::NoFields.into());
    }
    if let Some(position) = entity
        .fields
        .iter()
        .position(|f| f.name.trim().is_empty())
    {
        return Err(DomainError::EmptyFieldName {
            position: position + 1,
        }
        .into());
    }

    Ok(())
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub details: String,
    #[serde(skip)]
    status: u16,
}

impl ErrorResponse {
    /// Build a body for `error`. `details` describes the request, e.g. its
    /// path.
    pub fn from_error(error: &EntigenError, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: error.to_string(),
            details: details.into(),
            status: error.category().http_status(),
        }
    }

    /// 400 for validation errors, 404 for missing resources, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn to_json(&self) -> EntigenResult<String> {
        serde_json::to_string(self).map_err(|e| EntigenError::Internal {
            message: format!("failed to serialize error response: {e}"),
        })
    }
}

/// Result of looking up an archive for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    NotFound,
    Found {
        bytes: Vec<u8>,
        content_disposition: String,
    },
}

impl Download {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Look up `file_name` directly inside `output_root`.
///
/// Names with path separators, `..`, or anything other than a single
/// plain component are treated as not found.
///
/// # Errors
///
/// `FilesystemError` when the file exists but cannot be read.
pub fn resolve_download(output_root: &Path, file_name: &str) -> EntigenResult<Download> {
    if !is_plain_file_name(file_name) {
        warn!(file_name, "Rejected download name");
        return Ok(Download::NotFound);
    }

    let path = output_root.join(file_name);
    if !path.is_file() {
        debug!(path = %path.display(), "Download not found");
        return Ok(Download::NotFound);
    }

    match fs::read(&path) {
        Ok(bytes) => Ok(Download::Found {
            bytes,
            content_disposition: format!("attachment; filename=\"{file_name}\""),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Download::NotFound),
        Err(e) => Err(ApplicationError::FilesystemError {
            path,
            reason: format!("Failed to read archive: {e}"),
        }
        .into()),
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
