//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `entigen-adapters` crate provides implementations.

use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::application::CancellationToken;
use crate::domain::{ArchiveResult, ArtifactKind, BuildOutcome, RenderContext};
use crate::error::EntigenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `entigen_adapters::filesystem::LocalFilesystem` (production)
/// - `entigen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()>;

    /// Write content to a file, replacing any existing file.
    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> EntigenResult<()>;
}

/// Port for rendering one artifact kind.
///
/// Implementations must not keep state between calls: a single request
/// renders every kind independently.
#[cfg_attr(test, automock)]
pub trait ArtifactRenderer: Send + Sync {
    /// Render `kind` with `context`.
    ///
    /// # Errors
    ///
    /// `TemplateMissing` when no template exists for `kind`,
    /// `RenderingFailed` when the template references an unbound variable.
    fn render(&self, kind: ArtifactKind, context: &RenderContext) -> EntigenResult<String>;
}

/// Port for the external build step.
#[cfg_attr(test, automock)]
pub trait BuildRunner: Send + Sync {
    /// Build the project at `project_root`.
    ///
    /// A tool that runs and exits non-zero yields `Ok` with a failed
    /// outcome; errors are reserved for spawn failures, timeouts,
    /// cancellation and I/O on the child process.
    fn build(
        &self,
        project_root: &Path,
        artifact_id: &str,
        cancel: &CancellationToken,
    ) -> EntigenResult<BuildOutcome>;
}

/// Port for archiving a directory tree.
#[cfg_attr(test, automock)]
pub trait Packager: Send + Sync {
    /// Archive every regular file under `root` into `archive_path`.
    fn package_directory(&self, root: &Path, archive_path: &Path) -> EntigenResult<ArchiveResult>;
}
