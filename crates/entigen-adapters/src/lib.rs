//! Infrastructure adapters for entigen.
//!
//! This crate implements the ports defined in `entigen-core::application::ports`.
//! It contains all external dependencies and I/O operations: the local
//! filesystem, template storage and loading, the external build tool and
//! the zip packager. [`api`] holds the helpers an HTTP front end needs.

pub mod api;
pub mod archive;
pub mod build;
pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

// Re-export commonly used adapters
pub use archive::ZipPackager;
pub use build::{BuildCommand, CommandBuildRunner};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::BuiltinRenderer;
pub use template_loader::DirectoryTemplateLoader;
pub use template_store::InMemoryTemplateStore;
