//! Pipeline coordinator: scaffold, build, package.
//!
//! One call to [`PipelineService::generate`] walks the state machine
//! `Idle -> Scaffolding -> Building -> Packaging -> Done`. The first failing
//! stage short-circuits the run, moves it to `Failed(stage)` and surfaces as
//! [`EntigenError::Stage`]. Cancellation is checked before every stage.
//!
//! With [`WorkspaceLayout::Fixed`] every run shares one directory, so runs
//! are serialised by a mutex. [`WorkspaceLayout::PerRequest`] gives each run
//! its own `base/<request-id>` root and takes no lock.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError, CancellationToken,
        ports::{BuildRunner, Packager},
        services::Scaffolder,
    },
    domain::{
        ArchiveResult, BuildOutcome, BuildStatus, DomainValidator as validator, GeneratedProject,
        GenerationReport, GenerationRequest, PipelineStage, PipelineState, RetentionPolicy,
        WorkspaceLayout,
    },
    error::{EntigenError, EntigenResult},
};

/// Default base directory for per-request working roots.
pub const DEFAULT_WORKSPACE_BASE: &str = "generated-app";

/// How the coordinator lays out and cleans up working roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub layout: WorkspaceLayout,
    pub retention: RetentionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            layout: WorkspaceLayout::PerRequest {
                base: PathBuf::from(DEFAULT_WORKSPACE_BASE),
            },
            retention: RetentionPolicy::Keep,
        }
    }
}

/// Tracks the state machine of one run.
#[derive(Debug)]
struct RunTracker {
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    fn advance(&mut self) -> Option<PipelineStage> {
        let next = self.state.next()?;
        self.state = next;
        self.history.push(next);
        match next {
            PipelineState::Active(stage) => Some(stage),
            _ => None,
        }
    }

    fn fail(&mut self) {
        if let Some(failed) = self.state.fail() {
            self.state = failed;
            self.history.push(failed);
        }
    }

    fn describe(&self) -> String {
        self.history
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Runs the whole generation pipeline for a request.
pub struct PipelineService {
    scaffolder: Scaffolder,
    builder: Box<dyn BuildRunner>,
    packager: Box<dyn Packager>,
    config: PipelineConfig,
    shared_root: Mutex<()>,
}

impl PipelineService {
    pub fn new(
        scaffolder: Scaffolder,
        builder: Box<dyn BuildRunner>,
        packager: Box<dyn Packager>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            scaffolder,
            builder,
            packager,
            config,
            shared_root: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Directory a run with `request_id` scaffolds into.
    pub fn working_root(&self, request_id: Uuid) -> PathBuf {
        match &self.config.layout {
            WorkspaceLayout::Fixed(path) => path.clone(),
            WorkspaceLayout::PerRequest { base } => base.join(request_id.to_string()),
        }
    }

    /// Run the pipeline without external cancellation.
    pub fn generate(&self, request: &GenerationRequest) -> EntigenResult<GenerationReport> {
        self.generate_with(request, &CancellationToken::new())
    }

    /// Run the pipeline, checking `cancel` before every stage and while
    /// the build is running.
    #[instrument(
        skip_all,
        fields(class = %request.entity.qualified_name, request_id = tracing::field::Empty)
    )]
    pub fn generate_with(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> EntigenResult<GenerationReport> {
        let started = Instant::now();
        validator::validate_request(request)?;

        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let _guard = self.lock_if_shared()?;
        let root = self.working_root(request_id);
        info!(root = %root.display(), "Starting generation");

        let mut run = RunTracker::new();
        let result = self.run_stages(&mut run, &root, request, cancel);

        match result {
            Ok((project, build, archive)) => {
                run.advance();
                let total_duration = started.elapsed();
                info!(
                    total_ms = total_duration.as_millis() as u64,
                    build_ms = build.duration.as_millis() as u64,
                    archive = %archive.path.display(),
                    "Generation completed"
                );
                Ok(GenerationReport {
                    request_id,
                    class_name: request.simple_name().to_string(),
                    project,
                    build,
                    archive,
                    total_duration,
                    history: run.history,
                })
            }
            Err(e) => {
                error!(
                    stage = ?e.stage().map(|s| s.as_str()),
                    history = %run.describe(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Generation failed"
                );
                self.apply_retention(&root);
                Err(e)
            }
        }
    }

    fn run_stages(
        &self,
        run: &mut RunTracker,
        root: &Path,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> EntigenResult<(GeneratedProject, BuildOutcome, ArchiveResult)> {
        let project = self.stage(run, cancel, || self.scaffolder.scaffold(root, request))?;

        let build = self.stage(run, cancel, || {
            let outcome = self.builder.build(root, &request.artifact_id(), cancel)?;
            match outcome.status {
                BuildStatus::Succeeded => Ok(outcome),
                BuildStatus::Failed { exit_code } => Err(ApplicationError::BuildFailed {
                    exit_code,
                    output_tail: outcome.output_tail,
                }
                .into()),
            }
        })?;

        let archive_path = root.join(request.archive_file_name());
        let archive = self.stage(run, cancel, || {
            self.packager.package_directory(root, &archive_path)
        })?;

        Ok((project, build, archive))
    }

    /// Enter the next stage and run `f`, tagging any failure with the stage.
    fn stage<T>(
        &self,
        run: &mut RunTracker,
        cancel: &CancellationToken,
        f: impl FnOnce() -> EntigenResult<T>,
    ) -> EntigenResult<T> {
        let stage = run.advance().ok_or_else(|| EntigenError::Internal {
            message: format!("no stage follows {}", run.state),
        })?;
        info!(%stage, "Stage started");
        let stage_started = Instant::now();

        let result = cancel.check().map_err(EntigenError::from).and_then(|()| f());

        match result {
            Ok(value) => {
                info!(
                    %stage,
                    elapsed_ms = stage_started.elapsed().as_millis() as u64,
                    "Stage finished"
                );
                Ok(value)
            }
            Err(e) => {
                run.fail();
                Err(e.in_stage(stage))
            }
        }
    }

    fn lock_if_shared(&self) -> EntigenResult<Option<MutexGuard<'_, ()>>> {
        if !self.config.layout.is_shared() {
            return Ok(None);
        }
        self.shared_root
            .lock()
            .map(Some)
            .map_err(|_| ApplicationError::WorkspaceLockPoisoned.into())
    }

    fn apply_retention(&self, root: &Path) {
        if self.config.retention != RetentionPolicy::RemoveOnFailure || self.config.layout.is_shared() {
            info!(root = %root.display(), "Keeping working root for inspection");
            return;
        }

        match self.scaffolder.discard(root) {
            Ok(()) => info!(root = %root.display(), "Removed working root after failure"),
            Err(e) => warn!(root = %root.display(), error = %e, "Failed to remove working root"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{
        MockArtifactRenderer, MockBuildRunner, MockFilesystem, MockPackager,
    };
    use crate::domain::{DomainError, EntitySpec, FieldSpec};
    use std::time::Duration;

    fn request() -> GenerationRequest {
        GenerationRequest::new(EntitySpec::new(
            "com.demo.model.Order",
            vec![
                FieldSpec::new("id", "Long").primary(),
                FieldSpec::new("amount", "Double"),
            ],
        ))
    }

    fn scaffolder(fs: MockFilesystem) -> Scaffolder {
        let mut renderer = MockArtifactRenderer::new();
        renderer.expect_render().returning(|kind, _| Ok(kind.to_string()));
        Scaffolder::new(Box::new(renderer), Box::new(fs))
    }

    fn working_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs
    }

    fn succeeding_build() -> MockBuildRunner {
        let mut build = MockBuildRunner::new();
        build.expect_build().returning(|root, artifact_id, _| {
            Ok(BuildOutcome::succeeded(
                Duration::from_millis(5),
                root.join("target").join(format!("{artifact_id}.jar")),
            ))
        });
        build
    }

    fn recording_packager() -> MockPackager {
        let mut packager = MockPackager::new();
        packager.expect_package_directory().returning(|_, archive| {
            Ok(ArchiveResult {
                path: archive.to_path_buf(),
                entries: 8,
            })
        });
        packager
    }

    fn fixed(path: &str) -> PipelineConfig {
        PipelineConfig {
            layout: WorkspaceLayout::Fixed(PathBuf::from(path)),
            retention: RetentionPolicy::Keep,
        }
    }

    #[test]
    fn successful_run_walks_every_stage() {
        let service = PipelineService::new(
            scaffolder(working_fs()),
            Box::new(succeeding_build()),
            Box::new(recording_packager()),
            fixed("/work/app"),
        );

        let report = service.generate(&request()).unwrap();

        assert_eq!(
            report.history,
            vec![
                PipelineState::Idle,
                PipelineState::Active(PipelineStage::Scaffolding),
                PipelineState::Active(PipelineStage::Building),
                PipelineState::Active(PipelineStage::Packaging),
                PipelineState::Done,
            ]
        );
        assert_eq!(
            report.archive.path,
            PathBuf::from("/work/app/Order-generated-app.zip")
        );
        assert_eq!(
            report.build.package_path,
            Some(PathBuf::from("/work/app/target/order.jar"))
        );
        assert_eq!(report.class_name, "Order");
        assert!(report.total_duration >= report.build_duration());
    }

    #[test]
    fn failed_build_never_packages() {
        let mut build = MockBuildRunner::new();
        build.expect_build().returning(|_, _, _| {
            Ok(BuildOutcome::failed(Some(1), Duration::ZERO)
                .with_output_tail(vec!["[ERROR] compilation failure".into()]))
        });
        let mut packager = MockPackager::new();
        packager.expect_package_directory().never();

        let service = PipelineService::new(
            scaffolder(working_fs()),
            Box::new(build),
            Box::new(packager),
            fixed("/work/app"),
        );

        let err = service.generate(&request()).unwrap_err();
        assert_eq!(err.stage(), Some(PipelineStage::Building));
        assert!(matches!(
            err.root_cause(),
            EntigenError::Application(ApplicationError::BuildFailed {
                exit_code: Some(1),
                ..
            })
        ));
    }

    #[test]
    fn invalid_request_touches_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_create_dir_all().never();
        let mut build = MockBuildRunner::new();
        build.expect_build().never();

        let service = PipelineService::new(
            scaffolder(fs),
            Box::new(build),
            Box::new(MockPackager::new()),
            PipelineConfig::default(),
        );

        let bad = GenerationRequest::new(EntitySpec::new("Order", vec![FieldSpec::new("a", "int")]));
        let err = service.generate(&bad).unwrap_err();
        assert!(matches!(
            err,
            EntigenError::Domain(DomainError::InvalidQualifiedName { .. })
        ));
        assert_eq!(err.category().http_status(), 400);
    }

    #[test]
    fn cancelled_token_stops_before_scaffolding() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        let mut build = MockBuildRunner::new();
        build.expect_build().never();

        let service = PipelineService::new(
            scaffolder(fs),
            Box::new(build),
            Box::new(MockPackager::new()),
            fixed("/work/app"),
        );

        let token = CancellationToken::new();
        token.cancel();
        let err = service.generate_with(&request(), &token).unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::Scaffolding));
        assert!(matches!(
            err.root_cause(),
            EntigenError::Application(ApplicationError::Cancelled)
        ));
    }

    #[test]
    fn per_request_roots_are_distinct() {
        let service = PipelineService::new(
            scaffolder(MockFilesystem::new()),
            Box::new(MockBuildRunner::new()),
            Box::new(MockPackager::new()),
            PipelineConfig {
                layout: WorkspaceLayout::PerRequest {
                    base: PathBuf::from("/out"),
                },
                retention: RetentionPolicy::Keep,
            },
        );

        let a = service.working_root(Uuid::new_v4());
        let b = service.working_root(Uuid::new_v4());
        assert_ne!(a, b);
        assert!(a.starts_with("/out"));
        assert!(b.starts_with("/out"));
    }

    #[test]
    fn remove_on_failure_discards_per_request_root() {
        let mut fs = working_fs();
        fs.expect_remove_dir_all()
            .withf(|p| p.starts_with("/out"))
            .times(1)
            .returning(|_| Ok(()));

        let mut build = MockBuildRunner::new();
        build
            .expect_build()
            .returning(|_, _, _| Ok(BuildOutcome::failed(Some(2), Duration::ZERO)));

        let service = PipelineService::new(
            scaffolder(fs),
            Box::new(build),
            Box::new(MockPackager::new()),
            PipelineConfig {
                layout: WorkspaceLayout::PerRequest {
                    base: PathBuf::from("/out"),
                },
                retention: RetentionPolicy::RemoveOnFailure,
            },
        );

        assert!(service.generate(&request()).is_err());
    }

    #[test]
    fn fixed_layout_keeps_root_even_with_remove_policy() {
        let mut fs = working_fs();
        fs.expect_remove_dir_all().never();

        let mut build = MockBuildRunner::new();
        build
            .expect_build()
            .returning(|_, _, _| Ok(BuildOutcome::failed(Some(2), Duration::ZERO)));

        let service = PipelineService::new(
            scaffolder(fs),
            Box::new(build),
            Box::new(MockPackager::new()),
            PipelineConfig {
                layout: WorkspaceLayout::Fixed(PathBuf::from("/work/app")),
                retention: RetentionPolicy::RemoveOnFailure,
            },
        );

        assert!(service.generate(&request()).is_err());
    }
}
