//! Scenario tests for the install coordinator
//!
//! Network, process execution and PATH lookups are replaced by fakes;
//! filesystem steps still run for real inside a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio::sync::Notify;
use url::Url;

use super::*;
use crate::app::archive::{build_zip, list_files};
use crate::app::events::SilentObserver;
use crate::app::pipeline::{apply_file_step, OutputLine, PipelineStep, StepFailure, StepStatus};
use crate::errors::{AppError, NetworkError, NetworkResult, PipelineError, PreconditionError};

const INDEX_URL: &str = "https://releases.test/index";
const TEMPLATE: &str = "https://releases.test/download/{version}/latest.zip";

/// Serves a release index and one archive
struct FakeTransport {
    index: Vec<u8>,
    archive: Vec<u8>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn new(tag: &str, archive: Vec<u8>) -> Self {
        Self {
            index: format!(r#"[{{"tag_name":"{}"}},{{"tag_name":"old"}}]"#, tag).into_bytes(),
            archive,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpTransport for FakeTransport {
    async fn get(&self, url: &Url) -> NetworkResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        if url.as_str() == INDEX_URL {
            Ok(self.index.clone())
        } else if url.as_str().ends_with("/latest.zip") {
            Ok(self.archive.clone())
        } else {
            Err(NetworkError::ServerError {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

/// Records steps; commands succeed unless their program matches `fail_program`
#[derive(Default)]
struct RecordingExecutor {
    fail_program: Option<(String, i32)>,
    steps: Mutex<Vec<PipelineStep>>,
}

impl RecordingExecutor {
    fn failing(program: &str, code: i32) -> Self {
        Self {
            fail_program: Some((program.to_string(), code)),
            ..Default::default()
        }
    }

    fn recorded(&self) -> Vec<String> {
        self.steps
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl StepExecutor for RecordingExecutor {
    async fn execute(
        &self,
        step: &PipelineStep,
        working_dir: &Path,
        _output: &mut dyn FnMut(&OutputLine),
    ) -> std::result::Result<StepStatus, StepFailure> {
        self.steps.lock().unwrap().push(step.clone());

        if let PipelineStep::Command { program, .. } = step {
            return match &self.fail_program {
                Some((failing, code)) if failing == program => Ok(StepStatus { code: Some(*code) }),
                _ => Ok(StepStatus::SUCCESS),
            };
        }

        apply_file_step(step, working_dir)
            .await
            .map(|()| StepStatus::SUCCESS)
            .map_err(StepFailure::FileOperation)
    }
}

struct FakeProbe {
    yarn: bool,
}

impl CommandProbe for FakeProbe {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        (self.yarn && program == "yarn").then(|| PathBuf::from("/usr/local/bin/yarn"))
    }
}

#[derive(Default)]
struct EventLog(Vec<InstallEvent>);

/// Signals once extraction is about to start
struct ExtractionSignal(Arc<Notify>);

impl InstallObserver for ExtractionSignal {
    fn on_event(&mut self, event: &InstallEvent) {
        if let InstallEvent::Extracting { .. } = event {
            self.0.notify_one();
        }
    }
}

fn temp_archives(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("mylar_"))
        .collect()
}

impl InstallObserver for EventLog {
    fn on_event(&mut self, event: &InstallEvent) {
        self.0.push(event.clone());
    }
}

fn skeleton_archive() -> Vec<u8> {
    build_zip(&[
        ("composer.json", "{}"),
        ("resources/assets/sass/app.scss", "default"),
        ("resources/views/welcome.blade.php", "default"),
        ("templates/flatlab/assets/css/style.css", "flatlab"),
        ("templates/flatlab/views/layouts/app.blade.php", "flatlab"),
        ("templates/flatlab/webpack.mix.js", "mix.js('flatlab')"),
        ("templates/lte/assets/css/style.css", "lte"),
        ("templates/lte/views/layouts/app.blade.php", "lte"),
        ("templates/lte/webpack.mix.js", "mix.js('lte')"),
    ])
}

fn coordinator(
    transport: FakeTransport,
    executor: RecordingExecutor,
) -> InstallCoordinator<FakeTransport, RecordingExecutor, FakeProbe> {
    let config = CoordinatorConfig::default()
        .with_release_index_url(INDEX_URL)
        .with_download_url_template(TEMPLATE);
    InstallCoordinator::new(config, transport, executor, FakeProbe { yarn: true })
}

fn request(dir: &TempDir, name: Option<&str>, theme: Option<&str>) -> InstallRequest {
    InstallRequest::new(name.map(String::from), theme.map(String::from), dir.path())
}

#[tokio::test]
async fn test_flatlab_end_to_end() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );
    let mut events = EventLog::default();

    let report = coordinator
        .install(&request(&dir, Some("demo"), Some("flatlab")), &mut events)
        .await
        .unwrap();

    let target = dir.path().join("demo");
    assert_eq!(report.target, target);
    assert_eq!(report.version.as_str(), "v1.0.0");
    assert_eq!(report.steps_run, 10);
    assert!(target.is_dir());

    assert_eq!(
        coordinator.executor().recorded(),
        vec![
            "composer install --no-scripts",
            "composer run-script post-install-cmd",
            "composer run-script post-create-project-cmd",
            "yarn install",
            "remove resources/assets resources/views",
            "move templates/flatlab/assets -> resources/assets",
            "move templates/flatlab/views -> resources/views",
            "move templates/flatlab/webpack.mix.js -> webpack.mix.js",
            "remove templates",
            "yarn run dev",
        ]
    );

    assert_eq!(
        list_files(&target),
        vec![
            PathBuf::from("composer.json"),
            PathBuf::from("resources/assets/css/style.css"),
            PathBuf::from("resources/views/layouts/app.blade.php"),
            PathBuf::from("webpack.mix.js"),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(target.join("webpack.mix.js")).unwrap(),
        "mix.js('flatlab')"
    );

    assert!(matches!(events.0.first(), Some(InstallEvent::Creating { .. })));
    assert!(matches!(events.0.last(), Some(InstallEvent::Completed { .. })));
}

#[tokio::test]
async fn test_download_url_uses_resolved_tag() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v2.3.1", skeleton_archive()),
        RecordingExecutor::default(),
    );

    coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await
        .unwrap();

    let urls = coordinator.transport().urls.lock().unwrap().clone();
    assert_eq!(
        urls,
        vec![
            INDEX_URL.to_string(),
            "https://releases.test/download/v2.3.1/latest.zip".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_temp_archive_removed_after_success() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("mylar_"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_invalid_theme_makes_no_network_calls_and_no_writes() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("bogus")), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Precondition(PreconditionError::InvalidTheme { .. }))
    ));
    assert_eq!(coordinator.transport().calls(), 0);
    assert!(coordinator.executor().recorded().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_theme_is_precondition_error() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), None), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Precondition(PreconditionError::ThemeNotGiven { .. }))
    ));
    assert_eq!(coordinator.transport().calls(), 0);
}

#[tokio::test]
async fn test_missing_yarn_stops_before_network() {
    let dir = TempDir::new().unwrap();
    let config = CoordinatorConfig::default()
        .with_release_index_url(INDEX_URL)
        .with_download_url_template(TEMPLATE);
    let coordinator = InstallCoordinator::new(
        config,
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
        FakeProbe { yarn: false },
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Precondition(PreconditionError::MissingTool { .. }))
    ));
    assert_eq!(coordinator.transport().calls(), 0);
}

#[tokio::test]
async fn test_existing_target_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("demo");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("notes.txt"), "mine").unwrap();

    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Precondition(PreconditionError::TargetExists { .. }))
    ));
    assert_eq!(coordinator.transport().calls(), 0);
    assert_eq!(list_files(&target), vec![PathBuf::from("notes.txt")]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_composer_failure_stops_pipeline_before_layout() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::failing("composer", 2),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("flatlab")), &mut SilentObserver)
        .await;

    match result {
        Err(AppError::Pipeline(PipelineError::StepFailed { index, code, .. })) => {
            assert_eq!(index, 1);
            assert_eq!(code, Some(2));
        }
        other => panic!("Expected StepFailed, got {:?}", other),
    }
    assert_eq!(
        coordinator.executor().recorded(),
        vec!["composer install --no-scripts"]
    );

    let target = dir.path().join("demo");
    assert!(target.join("templates/flatlab/webpack.mix.js").is_file());
    assert!(target.join("resources/views/welcome.blade.php").is_file());
    assert!(!target.join("webpack.mix.js").exists());
}

#[tokio::test]
async fn test_corrupt_archive_is_archive_error_and_cleaned_up() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", b"not a zip".to_vec()),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await;

    assert!(matches!(result, Err(AppError::Archive(_))));
    assert!(coordinator.executor().recorded().is_empty());
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".zip"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_download_failure_is_network_error() {
    let dir = TempDir::new().unwrap();
    let config = CoordinatorConfig::default()
        .with_release_index_url(INDEX_URL)
        .with_download_url_template("https://releases.test/missing/{version}.tar");
    let coordinator = InstallCoordinator::new(
        config,
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
        FakeProbe { yarn: true },
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Network(NetworkError::ServerError { status: 404, .. }))
    ));
    assert!(!dir.path().join("demo").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_install_into_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("README.md"), "existing").unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    let report = coordinator
        .install(&request(&dir, None, Some("lte")), &mut SilentObserver)
        .await
        .unwrap();

    assert_eq!(report.target, dir.path());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("webpack.mix.js")).unwrap(),
        "mix.js('lte')"
    );
    assert!(dir.path().join("README.md").is_file());
    assert!(!dir.path().join("templates").exists());
}

#[tokio::test]
async fn test_existing_empty_target_is_rejected_before_network() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("demo")).unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("lte")), &mut SilentObserver)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Precondition(PreconditionError::TargetExists { .. }))
    ));
    assert_eq!(coordinator.transport().calls(), 0);
    assert_eq!(std::fs::read_dir(dir.path().join("demo")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cancel_during_extraction_removes_temp_archive() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", skeleton_archive()),
        RecordingExecutor::default(),
    );
    let extracting = Arc::new(Notify::new());
    let mut observer = ExtractionSignal(Arc::clone(&extracting));
    let request = request(&dir, Some("demo"), Some("lte"));

    let outcome = tokio::select! {
        biased;
        _ = extracting.notified() => None,
        result = coordinator.install(&request, &mut observer) => Some(result),
    };

    assert!(outcome.is_none(), "install should have been cancelled");
    assert_eq!(coordinator.transport().calls(), 2);
    assert!(temp_archives(dir.path()).is_empty());
    assert!(coordinator.executor().recorded().is_empty());
}

#[tokio::test]
async fn test_missing_theme_assets_fail_at_first_move() {
    let dir = TempDir::new().unwrap();
    let archive = build_zip(&[
        ("composer.json", "{}"),
        ("resources/assets/sass/app.scss", "default"),
        ("resources/views/welcome.blade.php", "default"),
        ("templates/flatlab/views/layouts/app.blade.php", "flatlab"),
        ("templates/flatlab/webpack.mix.js", "mix.js('flatlab')"),
    ]);
    let coordinator = coordinator(
        FakeTransport::new("v1.0.0", archive),
        RecordingExecutor::default(),
    );

    let result = coordinator
        .install(&request(&dir, Some("demo"), Some("flatlab")), &mut SilentObserver)
        .await;

    match result {
        Err(AppError::Pipeline(PipelineError::FileOperation { index, step, .. })) => {
            assert_eq!(index, 6);
            assert_eq!(step, "move templates/flatlab/assets -> resources/assets");
        }
        other => panic!("Expected FileOperation failure, got {:?}", other),
    }

    let recorded = coordinator.executor().recorded();
    assert_eq!(recorded.len(), 6);
    assert!(!recorded.iter().any(|step| step == "yarn run dev"));
    assert!(dir
        .path()
        .join("demo/templates/flatlab/webpack.mix.js")
        .is_file());
    assert!(temp_archives(dir.path()).is_empty());
}
