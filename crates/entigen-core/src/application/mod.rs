//! Application layer for entigen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Scaffolder, PipelineService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod cancellation;
pub mod error;
pub mod ports;
pub mod services;

pub use services::{PipelineConfig, PipelineService, Scaffolder};

// Re-export port traits (for adapter implementation)
pub use ports::{ArtifactRenderer, BuildRunner, Filesystem, Packager};

pub use cancellation::CancellationToken;
pub use error::ApplicationError;
