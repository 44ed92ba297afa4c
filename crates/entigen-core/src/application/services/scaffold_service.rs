//! Scaffolder - turns a request into a project tree on disk.
//!
//! Workflow:
//! 1. Validate the request (before anything touches disk)
//! 2. Remove the working root if it exists
//! 3. Render every artifact kind into a `ProjectStructure`
//! 4. Create the package directories and write the artifacts
//!
//! There is no rollback: a failure leaves whatever was written so far.

use std::path::Path;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ArtifactRenderer, Filesystem},
    },
    domain::{
        ArtifactKind, DomainValidator as validator, GeneratedArtifact, GeneratedProject,
        GenerationRequest, ProjectStructure, RelativePath, RenderContext,
        value_objects::{DB_DIR, JAVA_SRC_DIR, RESOURCES_DIR},
    },
    error::{EntigenError, EntigenResult},
};

/// Renders and writes the artifact set for one request.
pub struct Scaffolder {
    renderer: Box<dyn ArtifactRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl Scaffolder {
    pub fn new(renderer: Box<dyn ArtifactRenderer>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Scaffold `request` into `root`, destroying any previous content.
    ///
    /// # Errors
    ///
    /// - `Domain` when the request is invalid (nothing is touched on disk)
    /// - `Application::TemplateMissing` / `RenderingFailed` naming the kind
    /// - `Application::ArtifactWriteFailed` naming the kind and path
    #[instrument(
        skip_all,
        fields(
            class = %request.entity.qualified_name,
            root = %root.display()
        )
    )]
    pub fn scaffold(&self, root: &Path, request: &GenerationRequest) -> EntigenResult<GeneratedProject> {
        validator::validate_request(request).map_err(EntigenError::Domain)?;

        if self.filesystem.exists(root) {
            info!("Removing previous working root");
            self.filesystem.remove_dir_all(root)?;
        }

        let context = RenderContext::for_request(request);
        let structure = self.plan(root, request, &context)?;
        validator::validate_project_structure(&structure)?;

        let project = self.materialize(&structure)?;
        info!(
            artifacts = project.artifact_count(),
            namespace = %request.entity.namespace(),
            "Scaffold completed"
        );
        Ok(project)
    }

    /// Delete a working root and everything under it.
    pub fn discard(&self, root: &Path) -> EntigenResult<()> {
        self.filesystem.remove_dir_all(root)
    }

    /// Render every artifact kind into an in-memory structure.
    fn plan(
        &self,
        root: &Path,
        request: &GenerationRequest,
        context: &RenderContext,
    ) -> EntigenResult<ProjectStructure> {
        let namespace_path = request.entity.namespace_path();
        let class_name = request.simple_name();

        let java_root = RelativePath::new(format!("{JAVA_SRC_DIR}/{namespace_path}"));
        let mut structure = ProjectStructure::new(root);
        for sub in ArtifactKind::SUB_PACKAGES {
            structure.add_directory(java_root.join(sub));
        }
        structure.add_directory(RelativePath::new(RESOURCES_DIR));
        structure.add_directory(RelativePath::new(DB_DIR));

        for kind in ArtifactKind::ALL {
            let content = self.renderer.render(kind, context)?;
            debug!(%kind, bytes = content.len(), "Rendered artifact");
            structure.add_file(kind.relative_path(&namespace_path, class_name), content, kind);
        }

        Ok(structure)
    }

    fn materialize(&self, structure: &ProjectStructure) -> EntigenResult<GeneratedProject> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for dir in structure.directories() {
            self.filesystem.create_dir_all(&root.join(&dir.path))?;
        }

        let mut artifacts = Vec::with_capacity(ArtifactKind::ALL.len());
        for file in structure.files() {
            let path = root.join(&file.path);
            let written = match path.parent() {
                Some(parent) => self.filesystem.create_dir_all(parent),
                None => Ok(()),
            }
            .and_then(|()| self.filesystem.write_file(&path, &file.content));

            if let Err(e) = written {
                return Err(ApplicationError::ArtifactWriteFailed {
                    kind: file.kind,
                    path,
                    reason: e.to_string(),
                }
                .into());
            }

            debug!(kind = %file.kind, path = %path.display(), "Wrote artifact");
            artifacts.push(GeneratedArtifact {
                kind: file.kind,
                path,
            });
        }

        Ok(GeneratedProject {
            root: root.to_path_buf(),
            artifacts,
        })
    }
}
