//! entigen core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for entigen, the
//! entity-driven application generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           entigen-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (PipelineService, Scaffolder)       │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ArtifactRenderer,          │
//! │  BuildRunner, Packager)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    entigen-adapters (Infrastructure)    │
//! │ (LocalFilesystem, BuiltinRenderer,      │
//! │  CommandBuildRunner, ZipPackager)       │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (EntitySpec, type mapping, validation,  │
//! │  pipeline state machine)                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entigen_core::prelude::*;
//!
//! let scaffolder = Scaffolder::new(renderer, filesystem);
//! let pipeline = PipelineService::new(scaffolder, builder, packager, PipelineConfig::default());
//!
//! let request: GenerationRequest = serde_json::from_str(json)?;
//! let report = pipeline.generate(&request)?;
//! println!("{report}");
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CancellationToken, PipelineConfig, PipelineService, Scaffolder,
        ports::{ArtifactRenderer, BuildRunner, Filesystem, Packager},
    };
    pub use crate::domain::{
        ArchiveResult, ArtifactKind, BuildOutcome, BuildStatus, DomainError, EntitySpec,
        FieldSpec, GeneratedProject, GenerationReport, GenerationRequest, PipelineStage,
        PipelineState, RenderContext, RetentionPolicy, WorkspaceLayout, type_mapper,
    };
    pub use crate::error::{EntigenError, EntigenResult, ErrorCategory};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
