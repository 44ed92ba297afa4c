//! Unified error handling for entigen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, PipelineStage};

/// Root error type for entigen core operations.
#[derive(Debug, Error, Clone)]
pub enum EntigenError {
    /// Errors from the domain layer (business logic violations).
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// A pipeline stage failed. `source` is the underlying cause.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<EntigenError>,
    },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl EntigenError {
    /// Wrap `self` as a failure of `stage`. Already-staged errors keep
    /// their original stage.
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            staged @ Self::Stage { .. } => staged,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was raised in, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Strip stage wrappers down to the underlying cause.
    pub fn root_cause(&self) -> &EntigenError {
        match self {
            Self::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Stage { source, .. } => source.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run: entigen config list to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in entigen".into(),
                "Please report this issue with the full log (-vv)".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Stage { source, .. } => source.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether running the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Application(
                ApplicationError::BuildTimedOut { .. } | ApplicationError::Cancelled
            )
        )
    }
}

/// Error categories for UI display and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Cancelled,
    Internal,
}

impl ErrorCategory {
    /// HTTP status an API boundary should answer with.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Configuration | Self::Cancelled | Self::Internal => 500,
        }
    }
}

/// Convenient result type alias.
pub type EntigenResult<T> = Result<T, EntigenError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> EntigenResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> EntigenResult<T> {
        self.map_err(|e| EntigenError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_wrapping_keeps_first_stage() {
        let err = EntigenError::from(ApplicationError::Cancelled)
            .in_stage(PipelineStage::Building)
            .in_stage(PipelineStage::Packaging);

        assert_eq!(err.stage(), Some(PipelineStage::Building));
        assert!(matches!(
            err.root_cause(),
            EntigenError::Application(ApplicationError::Cancelled)
        ));
        assert!(err.to_string().starts_with("building stage failed"));
    }

    #[test]
    fn categories_map_to_http_statuses() {
        let validation = EntigenError::from(DomainError::NoFields);
        assert_eq!(validation.category().http_status(), 400);

        let staged = EntigenError::from(DomainError::NoFields).in_stage(PipelineStage::Scaffolding);
        assert_eq!(staged.category().http_status(), 400);

        let build = EntigenError::from(ApplicationError::BuildFailed {
            exit_code: Some(1),
            output_tail: vec![],
        });
        assert_eq!(build.category().http_status(), 500);

        let missing = EntigenError::from(DomainError::UnknownArtifactKind("x".into()));
        assert_eq!(missing.category().http_status(), 404);
    }

    #[test]
    fn timeouts_are_retryable() {
        let err = EntigenError::from(ApplicationError::BuildTimedOut {
            timeout: std::time::Duration::from_secs(1),
        })
        .in_stage(PipelineStage::Building);
        assert!(err.is_retryable());
        assert!(!EntigenError::from(DomainError::NoFields).is_retryable());
    }

    #[test]
    fn build_failure_message_names_exit_code() {
        let err = ApplicationError::BuildFailed {
            exit_code: Some(3),
            output_tail: vec![],
        };
        assert_eq!(err.to_string(), "Build failed with exit code 3");
    }
}
