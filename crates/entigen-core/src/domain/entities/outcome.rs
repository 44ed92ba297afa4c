use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{
    entities::project::GeneratedProject,
    value_objects::PipelineState,
};

/// How the external build ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    /// Non-zero exit. `None` when the process was killed by a signal.
    Failed { exit_code: Option<i32> },
}

/// Result of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub status: BuildStatus,
    pub duration: Duration,
    /// Where the build tool is expected to leave its package. Advisory only:
    /// nothing checks that the file exists.
    pub package_path: Option<PathBuf>,
    /// Last lines of combined stdout/stderr.
    pub output_tail: Vec<String>,
}

impl BuildOutcome {
    pub fn succeeded(duration: Duration, package_path: PathBuf) -> Self {
        Self {
            status: BuildStatus::Succeeded,
            duration,
            package_path: Some(package_path),
            output_tail: Vec::new(),
        }
    }

    pub fn failed(exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            status: BuildStatus::Failed { exit_code },
            duration,
            package_path: None,
            output_tail: Vec::new(),
        }
    }

    pub fn with_output_tail(mut self, tail: Vec<String>) -> Self {
        self.output_tail = tail;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Succeeded
    }
}

/// A written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    pub path: PathBuf,
    pub entries: usize,
}

/// Everything a successful pipeline run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub request_id: Uuid,
    pub class_name: String,
    pub project: GeneratedProject,
    pub build: BuildOutcome,
    pub archive: ArchiveResult,
    pub total_duration: Duration,
    pub history: Vec<PipelineState>,
}

impl GenerationReport {
    pub fn build_duration(&self) -> Duration {
        self.build.duration
    }

    /// Archive file name, without directories.
    pub fn archive_file_name(&self) -> Option<String> {
        self.archive
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Application for {} generated at {}",
            self.class_name,
            self.project.root.display()
        )?;
        match &self.build.package_path {
            Some(pkg) => writeln!(
                f,
                "Build succeeded in {:.1}s, package expected at {}",
                self.build.duration.as_secs_f64(),
                pkg.display()
            )?,
            None => writeln!(
                f,
                "Build finished in {:.1}s",
                self.build.duration.as_secs_f64()
            )?,
        }
        writeln!(
            f,
            "Archive created: {} ({} entries)",
            self.archive.path.display(),
            self.archive.entries
        )?;
        write!(
            f,
            "Total time: {:.1}s",
            self.total_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::PipelineStage;

    #[test]
    fn report_renders_as_text() {
        let report = GenerationReport {
            request_id: Uuid::nil(),
            class_name: "Order".into(),
            project: GeneratedProject {
                root: PathBuf::from("/work/app"),
                artifacts: Vec::new(),
            },
            build: BuildOutcome::succeeded(
                Duration::from_millis(1500),
                PathBuf::from("/work/app/target/order.jar"),
            ),
            archive: ArchiveResult {
                path: PathBuf::from("/work/app/Order-generated-app.zip"),
                entries: 8,
            },
            total_duration: Duration::from_secs(2),
            history: vec![
                PipelineState::Idle,
                PipelineState::Active(PipelineStage::Scaffolding),
                PipelineState::Done,
            ],
        };

        let text = report.to_string();
        assert!(text.contains("Application for Order generated at /work/app"));
        assert!(text.contains("Build succeeded in 1.5s"));
        assert!(text.contains("Order-generated-app.zip (8 entries)"));
        assert!(text.ends_with("Total time: 2.0s"));
        assert_eq!(
            report.archive_file_name().as_deref(),
            Some("Order-generated-app.zip")
        );
    }

    #[test]
    fn failed_outcome_has_no_package() {
        let outcome = BuildOutcome::failed(Some(1), Duration::ZERO)
            .with_output_tail(vec!["[ERROR] boom".into()]);
        assert!(!outcome.is_success());
        assert!(outcome.package_path.is_none());
        assert_eq!(outcome.output_tail.len(), 1);
    }
}
