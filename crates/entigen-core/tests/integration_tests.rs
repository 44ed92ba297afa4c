//! Integration tests for entigen-core: the pipeline driven through its ports.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use entigen_core::prelude::*;

// ============================================================================
// Fakes
// ============================================================================

#[derive(Clone, Default)]
struct SharedFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl SharedFs {
    fn read(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn paths_under(&self, root: &Path) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect()
    }
}

impl Filesystem for SharedFs {
    fn create_dir_all(&self, _path: &Path) -> EntigenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().keys().any(|p| p.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> EntigenResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

/// Renders each kind as a small summary of the context it received.
struct SummaryRenderer;

impl ArtifactRenderer for SummaryRenderer {
    fn render(&self, kind: ArtifactKind, ctx: &RenderContext) -> EntigenResult<String> {
        let fields = ctx
            .fields()
            .iter()
            .map(|f| format!("{}:{}", f.name, f.java_type))
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!("{kind} {} [{fields}]", ctx.class_name()))
    }
}

/// Succeeds after a short sleep, tracking how many builds overlap.
#[derive(Clone, Default)]
struct SlowBuild {
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    roots: Arc<Mutex<Vec<PathBuf>>>,
}

impl BuildRunner for SlowBuild {
    fn build(
        &self,
        project_root: &Path,
        artifact_id: &str,
        cancel: &CancellationToken,
    ) -> EntigenResult<BuildOutcome> {
        cancel.check()?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.roots.lock().unwrap().push(project_root.to_path_buf());

        thread::sleep(Duration::from_millis(20));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(BuildOutcome::succeeded(
            Duration::from_millis(20),
            project_root.join("target").join(format!("{artifact_id}.jar")),
        ))
    }
}

/// Counts the files under the root instead of writing a real archive.
struct CountingPackager {
    fs: SharedFs,
}

impl Packager for CountingPackager {
    fn package_directory(&self, root: &Path, archive_path: &Path) -> EntigenResult<ArchiveResult> {
        let entries = self.fs.paths_under(root).len();
        self.fs.write_file(archive_path, "zip")?;
        Ok(ArchiveResult {
            path: archive_path.to_path_buf(),
            entries,
        })
    }
}

fn service(layout: WorkspaceLayout, fs: SharedFs, build: SlowBuild) -> PipelineService {
    PipelineService::new(
        Scaffolder::new(Box::new(SummaryRenderer), Box::new(fs.clone())),
        Box::new(build),
        Box::new(CountingPackager { fs }),
        PipelineConfig {
            layout,
            retention: RetentionPolicy::Keep,
        },
    )
}

fn order_request() -> GenerationRequest {
    serde_json::from_str(
        r#"{
            "className": "com.demo.model.Order",
            "fields": [
                {"name": "id", "type": "Long", "primary": true},
                {"name": "amount", "type": "Double"}
            ]
        }"#,
    )
    .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn order_request_produces_full_project_and_archive() {
    let fs = SharedFs::default();
    let svc = service(
        WorkspaceLayout::Fixed(PathBuf::from("/work/generated-app")),
        fs.clone(),
        SlowBuild::default(),
    );

    let report = svc.generate(&order_request()).unwrap();
    let root = Path::new("/work/generated-app");

    let model = fs
        .read(&root.join("src/main/java/com/demo/model/Order.java"))
        .unwrap();
    assert_eq!(model, "model Order [id:Long,amount:Double]");
    assert!(fs.read(&root.join("pom.xml")).is_some());
    for rel in [
        "src/main/java/com/demo/repository/OrderRepository.java",
        "src/main/java/com/demo/service/OrderService.java",
        "src/main/java/com/demo/controller/OrderController.java",
    ] {
        assert!(fs.read(&root.join(rel)).is_some(), "{rel}");
    }

    assert!(report.build.is_success());
    assert_eq!(report.archive.path, root.join("Order-generated-app.zip"));
    assert_eq!(report.archive.entries, ArtifactKind::ALL.len());
    assert_eq!(report.history.last(), Some(&PipelineState::Done));
}

#[test]
fn missing_primary_key_is_synthesized_in_rendered_model() {
    let fs = SharedFs::default();
    let svc = service(
        WorkspaceLayout::Fixed(PathBuf::from("/w")),
        fs.clone(),
        SlowBuild::default(),
    );

    let req = GenerationRequest::new(EntitySpec::new(
        "acme.shop.Note",
        vec![FieldSpec::new("text", "string")],
    ));
    svc.generate(&req).unwrap();

    let model = fs.read(Path::new("/w/src/main/java/acme/shop/model/Note.java")).unwrap();
    assert_eq!(model, "model Note [id:Long,text:String]");
}

#[test]
fn fixed_layout_serialises_concurrent_runs() {
    let build = SlowBuild::default();
    let svc = Arc::new(service(
        WorkspaceLayout::Fixed(PathBuf::from("/shared")),
        SharedFs::default(),
        build.clone(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.generate(&order_request()).map(|_| ()))
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    assert_eq!(build.max_in_flight.load(Ordering::SeqCst), 1);
}

#[test]
fn per_request_layout_never_shares_a_root() {
    let build = SlowBuild::default();
    let svc = Arc::new(service(
        WorkspaceLayout::PerRequest {
            base: PathBuf::from("/base"),
        },
        SharedFs::default(),
        build.clone(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.generate(&order_request()).unwrap())
        })
        .collect();

    let reports: Vec<GenerationReport> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let roots: HashSet<_> = reports.iter().map(|r| r.project.root.clone()).collect();
    assert_eq!(roots.len(), 4);
    assert!(roots.iter().all(|r| r.starts_with("/base")));

    let ids: HashSet<_> = reports.iter().map(|r| r.request_id).collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn validation_errors_map_to_bad_request() {
    let svc = service(
        WorkspaceLayout::Fixed(PathBuf::from("/w")),
        SharedFs::default(),
        SlowBuild::default(),
    );

    let req = GenerationRequest::new(EntitySpec::new("com.demo.Order", vec![]));
    let err = svc.generate(&req).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.category().http_status(), 400);
}
