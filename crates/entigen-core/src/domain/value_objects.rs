//! Domain value objects: ArtifactKind, PipelineStage, PipelineState,
//! WorkspaceLayout, RetentionPolicy.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! This file defines the types, their string representations, and their
//! `FromStr` parsers. Path layout for each artifact kind also lives here
//! because it is a fixed property of the kind, not of any adapter.

use crate::domain::{entities::common::RelativePath, error::DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Root of generated Java sources, relative to the project root.
pub const JAVA_SRC_DIR: &str = "src/main/java";
/// Root of generated resources, relative to the project root.
pub const RESOURCES_DIR: &str = "src/main/resources";
/// Directory holding the generated database script.
pub const DB_DIR: &str = "src/db";

// ── ArtifactKind ──────────────────────────────────────────────────────────────

/// One of the fixed categories of generated file.
///
/// Every generation run produces exactly one file per kind, in the order of
/// [`ArtifactKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// The persistent entity class.
    Model,
    /// Data-access interface.
    Repository,
    /// Business service wrapping the repository.
    Service,
    /// REST entry point.
    Controller,
    /// Application bootstrap class.
    Application,
    /// `application.properties`.
    Properties,
    /// `pom.xml`.
    BuildDescriptor,
    /// `generated_schema.sql`.
    SchemaScript,
}

impl ArtifactKind {
    /// All kinds, in rendering order.
    pub const ALL: [ArtifactKind; 8] = [
        Self::Model,
        Self::Repository,
        Self::Service,
        Self::Controller,
        Self::Application,
        Self::Properties,
        Self::BuildDescriptor,
        Self::SchemaScript,
    ];

    /// Sub-packages created beneath the namespace directory.
    pub const SUB_PACKAGES: [&'static str; 4] = ["model", "repository", "service", "controller"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Application => "application",
            Self::Properties => "properties",
            Self::BuildDescriptor => "build-descriptor",
            Self::SchemaScript => "schema-script",
        }
    }

    /// File name a template override for this kind is loaded from.
    pub fn template_file_name(&self) -> String {
        format!("{}.tpl", self.as_str())
    }

    /// Canonical location of this artifact, relative to the project root.
    ///
    /// `namespace_path` is the slash-separated package directory
    /// (e.g. `com/demo`), `class_name` the simple entity name.
    pub fn relative_path(&self, namespace_path: &str, class_name: &str) -> RelativePath {
        let java = || RelativePath::new(format!("{JAVA_SRC_DIR}/{namespace_path}"));
        match self {
            Self::Model => java().join(format!("model/{class_name}.java")),
            Self::Repository => java().join(format!("repository/{class_name}Repository.java")),
            Self::Service => java().join(format!("service/{class_name}Service.java")),
            Self::Controller => java().join(format!("controller/{class_name}Controller.java")),
            Self::Application => java().join("Application.java"),
            Self::Properties => RelativePath::new(RESOURCES_DIR).join("application.properties"),
            Self::BuildDescriptor => RelativePath::new("pom.xml"),
            Self::SchemaScript => RelativePath::new(DB_DIR).join("generated_schema.sql"),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "model" | "entity" => Ok(Self::Model),
            "repository" | "access-layer" => Ok(Self::Repository),
            "service" => Ok(Self::Service),
            "controller" | "entry-point" => Ok(Self::Controller),
            "application" | "bootstrap" => Ok(Self::Application),
            "properties" | "resources" => Ok(Self::Properties),
            "build-descriptor" | "pom" => Ok(Self::BuildDescriptor),
            "schema-script" | "schema" | "sql" => Ok(Self::SchemaScript),
            other => Err(DomainError::UnknownArtifactKind(other.to_string())),
        }
    }
}

// ── Pipeline stages and state ─────────────────────────────────────────────────

/// An active stage of the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Scaffolding,
    Building,
    Packaging,
}

impl PipelineStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scaffolding => "scaffolding",
            Self::Building => "building",
            Self::Packaging => "packaging",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request pipeline state.
///
/// `Idle -> Scaffolding -> Building -> Packaging -> Done`, with
/// `Failed(stage)` reachable from any active state. `Done` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Active(PipelineStage),
    Done,
    Failed(PipelineStage),
}

impl PipelineState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// The state that follows `self` on success, or `None` once terminal.
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Active(PipelineStage::Scaffolding)),
            Self::Active(PipelineStage::Scaffolding) => Some(Self::Active(PipelineStage::Building)),
            Self::Active(PipelineStage::Building) => Some(Self::Active(PipelineStage::Packaging)),
            Self::Active(PipelineStage::Packaging) => Some(Self::Done),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// The failure state for the current stage, or `None` when no stage is active.
    pub const fn fail(&self) -> Option<Self> {
        match self {
            Self::Active(stage) => Some(Self::Failed(*stage)),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Active(stage) => write!(f, "{stage}"),
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

// ── Workspace layout ──────────────────────────────────────────────────────────

/// Where a generation run scaffolds its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceLayout {
    /// One shared directory, destructively reused. Runs are serialised.
    Fixed(PathBuf),
    /// `base/<request-id>` per run. Runs never share a directory.
    PerRequest { base: PathBuf },
}

impl WorkspaceLayout {
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// What happens to a working root after a failed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// Leave everything on disk for inspection.
    #[default]
    Keep,
    /// Delete the working root, per-request layouts only.
    RemoveOnFailure,
}

impl FromStr for RetentionPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "remove-on-failure" | "remove_on_failure" | "clean" => Ok(Self::RemoveOnFailure),
            other => Err(DomainError::InvalidOption {
                option: "retention",
                value: other.to_string(),
            }),
        }
    }
}
