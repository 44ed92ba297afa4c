//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::ArtifactKind;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template registered for an artifact kind.
    #[error("No template for artifact kind '{kind}'")]
    TemplateMissing { kind: ArtifactKind },

    /// Template rendering failed (unbound placeholder, bad template).
    #[error("Rendering {kind} failed: {reason}")]
    RenderingFailed { kind: ArtifactKind, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Writing one artifact failed; the scaffold stops there.
    #[error("Failed to write {kind} artifact to {path}: {reason}")]
    ArtifactWriteFailed {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    /// The build tool could not be started.
    #[error("Build tool '{program}' could not be started: {reason}")]
    BuildToolUnavailable { program: String, reason: String },

    /// The build tool ran and exited non-zero.
    #[error("Build failed {}", exit_label(.exit_code))]
    BuildFailed {
        exit_code: Option<i32>,
        output_tail: Vec<String>,
    },

    /// The build exceeded its time limit and was killed.
    #[error("Build timed out after {}s", .timeout.as_secs())]
    BuildTimedOut { timeout: Duration },

    /// Waiting on or reading from the build process failed.
    #[error("Build process error: {reason}")]
    BuildIo { reason: String },

    /// Archive creation failed.
    #[error("Packaging {path} failed: {reason}")]
    PackageFailed { path: PathBuf, reason: String },

    /// The run was cancelled by the caller.
    #[error("Generation cancelled")]
    Cancelled,

    /// Shared workspace lock poisoned.
    #[error("Workspace lock poisoned")]
    WorkspaceLockPoisoned,

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,
}

fn exit_label(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("with exit code {code}"),
        None => "(terminated by signal)".to_string(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateMissing { kind } => vec![
                format!("Provide a '{}' template", kind.template_file_name()),
                "Or remove templates.dir from your configuration to use the built-ins".into(),
            ],
            Self::RenderingFailed { kind, .. } => vec![
                format!("Check the placeholders used by the {kind} template"),
                "Run: entigen types to see supported field types".into(),
            ],
            Self::FilesystemError { path, .. } | Self::ArtifactWriteFailed { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure there is enough disk space".into(),
            ],
            Self::BuildToolUnavailable { program, .. } => vec![
                format!("Make sure '{program}' is installed and on PATH"),
                "Or set build.command in your configuration".into(),
            ],
            Self::BuildFailed { output_tail, .. } => {
                let mut s = vec!["Inspect the generated project and build output".into()];
                s.extend(output_tail.iter().rev().take(3).rev().cloned());
                s
            }
            Self::BuildTimedOut { .. } => vec![
                "Increase build.timeout_secs or pass --timeout".into(),
                "A first build may need to download dependencies".into(),
            ],
            Self::PackageFailed { path, .. } => vec![
                format!("Could not write archive: {}", path.display()),
                "Check free disk space and permissions".into(),
            ],
            Self::StoreLockError | Self::WorkspaceLockPoisoned => vec![
                "A previous run panicked while holding a lock".into(),
                "Restart the process".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateMissing { .. } => ErrorCategory::NotFound,
            Self::BuildToolUnavailable { .. } => ErrorCategory::Configuration,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::ArtifactWriteFailed { .. }
            | Self::BuildFailed { .. }
            | Self::BuildTimedOut { .. }
            | Self::BuildIo { .. }
            | Self::PackageFailed { .. }
            | Self::WorkspaceLockPoisoned
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }

    /// The artifact kind this error concerns, if any.
    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self {
            Self::TemplateMissing { kind }
            | Self::RenderingFailed { kind, .. }
            | Self::ArtifactWriteFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
