pub mod common;
pub mod entity;
pub mod outcome;
pub mod project;
pub mod render_context;

pub use crate::domain::DomainError;
pub use entity::{EntitySpec, FieldSpec, GenerationRequest};
pub use outcome::{ArchiveResult, BuildOutcome, BuildStatus, GenerationReport};
pub use project::{GeneratedArtifact, GeneratedProject, ProjectStructure};
pub use render_context::{RenderContext, ResolvedField, UnboundPlaceholder};
