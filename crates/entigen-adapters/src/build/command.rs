//! Build runner that shells out to a configurable program.

use std::{
    collections::VecDeque,
    fmt,
    io::{BufRead, BufReader, Read},
    path::Path,
    process::{Child, Command, Stdio},
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use entigen_core::{
    application::{ApplicationError, CancellationToken, ports::BuildRunner},
    domain::BuildOutcome,
    error::EntigenResult,
};
use tracing::{debug, info, instrument, warn};

/// Default limit on a single build.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
/// How often the child is polled for exit, cancellation and timeout.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Lines of combined output kept for error reports.
pub const DEFAULT_TAIL_LINES: usize = 50;
/// Tracing target every line of build output is logged under.
pub const BUILD_OUTPUT_TARGET: &str = "entigen::build";

/// Program and arguments used to build a generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self::new("mvn", ["clean", "package", "-q"])
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs the build tool as a child process in the project root.
///
/// Output from both streams is mirrored line by line to `tracing` at `info`
/// under [`BUILD_OUTPUT_TARGET`] and the last lines are kept for the
/// outcome. The calling thread polls the child so it can honour the timeout
/// and the cancellation token; either one kills the process. The timeout
/// also bounds draining the output: a background process left behind by
/// the build can hold the pipes open long after the child exits.
#[derive(Debug, Clone)]
pub struct CommandBuildRunner {
    command: BuildCommand,
    timeout: Duration,
    poll_interval: Duration,
    tail_lines: usize,
}

impl CommandBuildRunner {
    pub fn new(command: BuildCommand) -> Self {
        Self {
            command,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_tail_lines(mut self, lines: usize) -> Self {
        self.tail_lines = lines;
        self
    }

    pub fn command(&self) -> &BuildCommand {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self, project_root: &Path) -> EntigenResult<Child> {
        Command::new(&self.command.program)
            .args(&self.command.args)
            .current_dir(project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ApplicationError::BuildToolUnavailable {
                    program: self.command.program.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

impl Default for CommandBuildRunner {
    fn default() -> Self {
        Self::new(BuildCommand::default())
    }
}

impl BuildRunner for CommandBuildRunner {
    #[instrument(
        skip(self, cancel),
        fields(command = %self.command, root = %project_root.display())
    )]
    fn build(
        &self,
        project_root: &Path,
        artifact_id: &str,
        cancel: &CancellationToken,
    ) -> EntigenResult<BuildOutcome> {
        let started = Instant::now();
        let mut child = self.spawn(project_root)?;
        info!(pid = child.id(), "Build started");

        let deadline = started + self.timeout;
        let tail = OutputTail::new(self.tail_lines);
        let (done_tx, done_rx) = mpsc::channel();
        let mut readers = 0;
        if let Some(stdout) = child.stdout.take() {
            tail.spawn_reader("stdout", stdout, done_tx.clone());
            readers += 1;
        }
        if let Some(stderr) = child.stderr.take() {
            tail.spawn_reader("stderr", stderr, done_tx.clone());
            readers += 1;
        }
        drop(done_tx);

        let status = loop {
            if cancel.is_cancelled() {
                warn!("Build cancelled, killing process");
                terminate(&mut child);
                return Err(ApplicationError::Cancelled.into());
            }

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    terminate(&mut child);
                    return Err(ApplicationError::BuildIo {
                        reason: e.to_string(),
                    }
                    .into());
                }
            }

            if Instant::now() >= deadline {
                warn!(timeout_secs = self.timeout.as_secs(), "Build timed out, killing process");
                terminate(&mut child);
                return Err(ApplicationError::BuildTimedOut {
                    timeout: self.timeout,
                }
                .into());
            }

            thread::sleep(self.poll_interval);
        };

        if !drain_output(&done_rx, readers, deadline) {
            warn!(
                timeout_secs = self.timeout.as_secs(),
                "Build output still open at the deadline, a background process holds the pipes"
            );
        }

        let duration = started.elapsed();
        let lines = tail.into_lines();

        if status.success() {
            let package = project_root
                .join("target")
                .join(format!("{artifact_id}.jar"));
            info!(duration_ms = duration.as_millis() as u64, "Build succeeded");
            Ok(BuildOutcome::succeeded(duration, package).with_output_tail(lines))
        } else {
            warn!(exit_code = ?status.code(), "Build failed");
            Ok(BuildOutcome::failed(status.code(), duration).with_output_tail(lines))
        }
    }
}

/// Wait until `readers` output readers report end-of-stream or `deadline`
/// passes. `false` means output was abandoned; the readers are detached.
fn drain_output(done: &Receiver<&'static str>, readers: usize, deadline: Instant) -> bool {
    let mut pending = readers;
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match done.recv_timeout(remaining) {
            Ok(stream) => {
                debug!(stream, "Build output closed");
                pending -= 1;
            }
            // Every sender is gone, so no reader is still running.
            Err(RecvTimeoutError::Disconnected) => return true,
            Err(RecvTimeoutError::Timeout) => return false,
        }
    }
    true
}

/// Kill and reap. Reader threads are left to finish on their own: a
/// grandchild may still hold the pipes open.
fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "Kill failed, process already exited");
    }
    if let Err(e) = child.wait() {
        debug!(error = %e, "Failed to reap build process");
    }
}

/// Bounded buffer of the most recent output lines from both streams.
#[derive(Clone)]
struct OutputTail {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl OutputTail {
    fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Read `source` to the end on a detached thread, then report `stream`
    /// on `done`.
    fn spawn_reader<R>(&self, stream: &'static str, source: R, done: Sender<&'static str>)
    where
        R: Read + Send + 'static,
    {
        let tail = self.clone();
        thread::spawn(move || {
            for line in BufReader::new(source).lines() {
                match line {
                    Ok(line) => {
                        info!(target: BUILD_OUTPUT_TARGET, stream, "{line}");
                        tail.push(line);
                    }
                    Err(e) => {
                        debug!(stream, error = %e, "Stopped reading build output");
                        break;
                    }
                }
            }
            // The build may already have returned and dropped the receiver.
            let _ = done.send(stream);
        });
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_quiet_maven_package() {
        let command = BuildCommand::default();
        assert_eq!(command.to_string(), "mvn clean package -q");
    }

    #[test]
    fn parse_splits_on_whitespace() {
        let command = BuildCommand::parse("  gradle  build --offline ").unwrap();
        assert_eq!(command.program, "gradle");
        assert_eq!(command.args, vec!["build", "--offline"]);
        assert!(BuildCommand::parse("   ").is_none());
    }

    #[test]
    fn output_tail_keeps_most_recent_lines() {
        let tail = OutputTail::new(2);
        for line in ["a", "b", "c"] {
            tail.push(line.to_string());
        }
        assert_eq!(tail.into_lines(), vec!["b", "c"]);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use entigen_core::{domain::BuildStatus, error::EntigenError};
        use tempfile::TempDir;

        fn sh(script: &str) -> CommandBuildRunner {
            CommandBuildRunner::new(BuildCommand::new("sh", ["-c", script]))
                .with_poll_interval(Duration::from_millis(10))
        }

        #[test]
        fn zero_exit_succeeds_with_advisory_package_path() {
            let temp = TempDir::new().unwrap();
            let outcome = sh("echo building; echo done >&2")
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap();

            assert!(outcome.is_success());
            assert_eq!(
                outcome.package_path,
                Some(temp.path().join("target").join("order.jar"))
            );
            assert!(outcome.output_tail.contains(&"building".to_string()));
            assert!(outcome.output_tail.contains(&"done".to_string()));
        }

        #[test]
        fn runs_in_the_project_root() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("pom.xml"), "<project/>").unwrap();

            let outcome = sh("test -f pom.xml")
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap();
            assert!(outcome.is_success());
        }

        #[test]
        fn non_zero_exit_is_a_failed_outcome() {
            let temp = TempDir::new().unwrap();
            let outcome = sh("echo '[ERROR] compilation failure'; exit 3")
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap();

            assert_eq!(outcome.status, BuildStatus::Failed { exit_code: Some(3) });
            assert_eq!(outcome.package_path, None);
            assert_eq!(outcome.output_tail, vec!["[ERROR] compilation failure"]);
        }

        #[test]
        fn missing_program_is_unavailable() {
            let temp = TempDir::new().unwrap();
            let runner = CommandBuildRunner::new(BuildCommand::new(
                "entigen-no-such-build-tool",
                Vec::<String>::new(),
            ));

            let err = runner
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap_err();
            assert!(matches!(
                err,
                EntigenError::Application(ApplicationError::BuildToolUnavailable { .. })
            ));
        }

        #[test]
        fn timeout_kills_the_child() {
            let temp = TempDir::new().unwrap();
            let started = Instant::now();

            let err = sh("exec sleep 30")
                .with_timeout(Duration::from_millis(200))
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap_err();

            assert!(matches!(
                err,
                EntigenError::Application(ApplicationError::BuildTimedOut { .. })
            ));
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn background_process_holding_the_pipes_does_not_outlive_the_timeout() {
            let temp = TempDir::new().unwrap();
            let started = Instant::now();

            let outcome = sh("sleep 30 & echo started")
                .with_timeout(Duration::from_secs(1))
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap();

            assert!(started.elapsed() < Duration::from_secs(10));
            assert!(outcome.is_success());
            assert_eq!(outcome.output_tail, vec!["started"]);
        }

        #[test]
        fn output_is_drained_before_the_outcome() {
            let temp = TempDir::new().unwrap();
            let outcome = sh("for i in 1 2 3 4 5; do echo line$i; done")
                .with_tail_lines(2)
                .build(temp.path(), "order", &CancellationToken::new())
                .unwrap();
            assert_eq!(outcome.output_tail, vec!["line4", "line5"]);
        }

        #[test]
        fn drain_gives_up_at_the_deadline() {
            let (tx, rx) = mpsc::channel::<&'static str>();
            let started = Instant::now();
            assert!(!drain_output(&rx, 1, Instant::now() + Duration::from_millis(50)));
            assert!(started.elapsed() < Duration::from_secs(5));

            tx.send("stdout").unwrap();
            drop(tx);
            assert!(drain_output(&rx, 2, Instant::now() + Duration::from_secs(5)));
        }

        #[test]
        fn cancellation_kills_the_child() {
            let temp = TempDir::new().unwrap();
            let token = CancellationToken::new();
            let trigger = token.clone();
            let canceller = thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                trigger.cancel();
            });

            let started = Instant::now();
            let err = sh("exec sleep 30")
                .build(temp.path(), "order", &token)
                .unwrap_err();
            canceller.join().unwrap();

            assert!(matches!(
                err,
                EntigenError::Application(ApplicationError::Cancelled)
            ));
            assert!(started.elapsed() < Duration::from_secs(10));
        }
    }
}
