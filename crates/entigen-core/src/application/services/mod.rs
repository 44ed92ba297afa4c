//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! the two use cases: "scaffold a project" and "run the whole pipeline".

pub mod pipeline_service;
pub mod scaffold_service;

pub use pipeline_service::{PipelineConfig, PipelineService};
pub use scaffold_service::Scaffolder;
