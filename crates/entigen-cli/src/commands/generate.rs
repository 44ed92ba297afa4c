//! Implementation of the `entigen generate` command.
//!
//! Responsibility: read the request, fold CLI flags into the configuration,
//! wire the adapters into a `PipelineService`, and display the report. No
//! business logic lives here.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;
use tracing::{debug, info, instrument};

use entigen_adapters::{
    BuildCommand, BuiltinRenderer, CommandBuildRunner, DirectoryTemplateLoader,
    InMemoryTemplateStore, LocalFilesystem, ZipPackager, api::validate_incoming,
};
use entigen_core::{
    application::{PipelineService, Scaffolder},
    domain::{ArtifactKind, DomainValidator, GenerationReport, GenerationRequest, RetentionPolicy},
};

use crate::{
    cli::GenerateArgs,
    config::{AppConfig, LayoutMode},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `entigen generate` command.
///
/// 1. Read and parse the request (file or stdin)
/// 2. Apply the configured group id and CLI overrides
/// 3. Validate the request shape
/// 4. Early-exit with the planned files if `--dry-run`
/// 5. Run scaffold, build and package
/// 6. Print the report
#[instrument(skip_all, fields(request = %args.request.display()))]
pub fn execute(args: GenerateArgs, mut config: AppConfig, output: OutputManager) -> CliResult<()> {
    let request = read_request(&args.request)?
        .with_default_group_id(config.generation.group_id.clone());
    let request = match &args.group_id {
        Some(group) => request.with_group_id(group.clone()),
        None => request,
    };

    validate_incoming(&request)?;
    apply_overrides(&args, &mut config)?;

    if args.dry_run {
        DomainValidator::validate_request(&request).map_err(|e| CliError::Core(e.into()))?;
        return show_plan(&request, &config, &output);
    }

    let pipeline = build_pipeline(&config, &output)?;

    output.header(&format!("Generating {}...", request.entity.qualified_name))?;
    let spinner = output.spinner("Scaffolding, building and packaging");
    let result = pipeline.generate(&request);
    spinner.finish_and_clear();

    let report = result?;
    info!(request_id = %report.request_id, "Generation finished");

    if output.is_json() {
        output.json(&GenerateSummary::from(&report))?;
        return Ok(());
    }

    output.success(&format!("{} application generated", report.class_name))?;
    for line in report.to_string().lines() {
        output.print(&format!("  {line}"))?;
    }

    if let Some(file) = report.archive_file_name() {
        output.print("")?;
        output.print("Fetch the archive with:")?;
        output.print(&format!(
            "  entigen download {file} --root {}",
            report.project.root.display()
        ))?;
    }

    Ok(())
}

// ── Request input ─────────────────────────────────────────────────────────────

fn read_request(source: &Path) -> CliResult<GenerationRequest> {
    let (origin, text) = if source == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .with_cli_context(|| "Failed to read request from stdin")?;
        ("stdin".to_string(), text)
    } else {
        if !source.is_file() {
            return Err(CliError::NotFound {
                what: format!("request file '{}'", source.display()),
            });
        }
        let text = fs::read_to_string(source)
            .with_cli_context(|| format!("Failed to read '{}'", source.display()))?;
        (source.display().to_string(), text)
    };

    parse_request(&text, origin)
}

fn parse_request(text: &str, origin: String) -> CliResult<GenerationRequest> {
    serde_json::from_str(text).map_err(|source| CliError::InvalidRequest { origin, source })
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Fold command-line flags over the loaded configuration.
fn apply_overrides(args: &GenerateArgs, config: &mut AppConfig) -> CliResult<()> {
    if let Some(root) = &args.output {
        config.output.root = root.clone();
    }
    if args.fixed {
        config.output.layout = LayoutMode::Fixed;
    }
    if args.clean_on_failure {
        config.output.retention = RetentionPolicy::RemoveOnFailure;
    }
    if let Some(line) = &args.build_cmd {
        let command = BuildCommand::parse(line).ok_or_else(|| CliError::InvalidInput {
            message: "--build-cmd must not be empty".into(),
            source: None,
        })?;
        config.build.command = command.program;
        config.build.args = command.args;
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            return Err(CliError::InvalidInput {
                message: "--timeout must be at least 1 second".into(),
                source: None,
            });
        }
        config.build.timeout_secs = secs;
    }
    if let Some(dir) = &args.templates {
        config.templates.dir = Some(dir.clone());
    }
    Ok(())
}

fn build_pipeline(config: &AppConfig, output: &OutputManager) -> CliResult<PipelineService> {
    let store = InMemoryTemplateStore::with_builtin()?;
    if let Some(dir) = &config.templates.dir {
        let replaced = DirectoryTemplateLoader::new(dir).load_into(&store)?;
        debug!(count = replaced.len(), dir = %dir.display(), "Template overrides loaded");
        if !replaced.is_empty() {
            let names: Vec<_> = replaced.iter().map(ArtifactKind::as_str).collect();
            output.info(&format!("Using template overrides for: {}", names.join(", ")))?;
        }
    }

    let scaffolder = Scaffolder::new(
        Box::new(BuiltinRenderer::new(store)),
        Box::new(LocalFilesystem::new()),
    );
    let builder = CommandBuildRunner::new(BuildCommand::new(
        config.build.command.clone(),
        config.build.args.clone(),
    ))
    .with_timeout(Duration::from_secs(config.build.timeout_secs));

    Ok(PipelineService::new(
        scaffolder,
        Box::new(builder),
        Box::new(ZipPackager::new()),
        config.pipeline_config(),
    ))
}

// ── Dry run ───────────────────────────────────────────────────────────────────

/// Files a run would write, relative to its working root.
fn planned_files(request: &GenerationRequest) -> Vec<(ArtifactKind, String)> {
    let namespace_path = request.entity.namespace_path();
    let class_name = request.simple_name();
    ArtifactKind::ALL
        .into_iter()
        .map(|kind| {
            (
                kind,
                kind.relative_path(&namespace_path, class_name).to_slash_string(),
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct Plan {
    class_name: String,
    group_id: String,
    artifact_id: String,
    root: PathBuf,
    files: Vec<String>,
    archive: String,
}

fn show_plan(request: &GenerationRequest, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = match config.output.layout {
        LayoutMode::Fixed => config.output.root.clone(),
        LayoutMode::PerRequest => config.output.root.join("<request-id>"),
    };
    let plan = Plan {
        class_name: request.entity.qualified_name.clone(),
        group_id: request.group_id().to_string(),
        artifact_id: request.artifact_id(),
        root,
        files: planned_files(request).into_iter().map(|(_, p)| p).collect(),
        archive: request.archive_file_name(),
    };

    if output.is_json() {
        output.json(&plan)?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would generate {} into {}",
        plan.class_name,
        plan.root.display()
    ))?;
    output.print(&format!("  groupId:    {}", plan.group_id))?;
    output.print(&format!("  artifactId: {}", plan.artifact_id))?;
    for file in &plan.files {
        output.print(&format!("  {file}"))?;
    }
    output.print(&format!("  {} (after build)", plan.archive))?;
    Ok(())
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateSummary {
    request_id: String,
    class_name: String,
    root: PathBuf,
    archive: PathBuf,
    entries: usize,
    package: Option<PathBuf>,
    build_secs: f64,
    total_secs: f64,
    history: Vec<String>,
}

impl From<&GenerationReport> for GenerateSummary {
    fn from(report: &GenerationReport) -> Self {
        Self {
            request_id: report.request_id.to_string(),
            class_name: report.class_name.clone(),
            root: report.project.root.clone(),
            archive: report.archive.path.clone(),
            entries: report.archive.entries,
            package: report.build.package_path.clone(),
            build_secs: report.build_duration().as_secs_f64(),
            total_secs: report.total_duration.as_secs_f64(),
            history: report.history.iter().map(ToString::to_string).collect(),
        }
    }
}
