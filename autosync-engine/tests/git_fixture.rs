//! End-to-end coverage against real git repositories: a bare origin, a
//! writer clone that pushes upstream commits, and the watched local clone.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use autosync_core::{AutosyncError, RepoConfig, DEFAULT_SYNC_COMMAND, UNBOUNDED};
use autosync_engine::{detect, resolve, syncer, Overrides, SyncLoop};

// Every operation here enters the repository via the directory scope, and
// cwd is process-global; serialize the whole file.
static CWD_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.name=autosync-tests",
            "-c",
            "user.email=autosync-tests@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

struct Fixture {
    _root: TempDir,
    origin: PathBuf,
    writer: PathBuf,
    local: PathBuf,
}

impl Fixture {
    /// Bare origin with one seed commit on `main`, a writer clone for
    /// pushing upstream changes, and the watched local clone.
    fn new() -> Self {
        let root = TempDir::new().expect("fixture root");
        let origin = root.path().join("origin.git");
        fs::create_dir(&origin).expect("origin dir");
        git(&origin, &["init", "-q", "--bare"]);

        let origin_url = origin.to_str().expect("utf8 path").to_string();
        git(root.path(), &["clone", "-q", &origin_url, "writer"]);
        let writer = root.path().join("writer");
        // The clone's HEAD is unborn; point it at main regardless of the
        // host git's init.defaultBranch.
        git(&writer, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        fs::write(writer.join("README.md"), "seed\n").expect("seed file");
        git(&writer, &["add", "README.md"]);
        git(&writer, &["commit", "-q", "-m", "seed"]);
        git(&writer, &["push", "-q", "-u", "origin", "main"]);

        git(root.path(), &["clone", "-q", "-b", "main", &origin_url, "local"]);
        let local = root.path().join("local");

        Self {
            _root: root,
            origin,
            writer,
            local,
        }
    }

    fn push_upstream(&self, file: &str, content: &str) {
        fs::write(self.writer.join(file), content).expect("write upstream file");
        git(&self.writer, &["add", file]);
        git(&self.writer, &["commit", "-q", "-m", "upstream change"]);
        git(&self.writer, &["push", "-q", "origin", "main"]);
    }

    fn config(&self) -> RepoConfig {
        resolve(&self.local, Overrides::default()).expect("resolve fixture config")
    }
}

#[test]
fn resolve_fills_remote_and_branch_from_the_repository() {
    let _guard = lock();
    let fixture = Fixture::new();

    let config = fixture.config();

    assert!(
        config.remote_url.ends_with("origin.git"),
        "remote URL should come from remote.origin.url, got {}",
        config.remote_url
    );
    assert_eq!(config.branch, "main");
    assert_eq!(config.max_iterations, UNBOUNDED);
    assert_eq!(config.interval, Duration::from_secs(5));
    assert_eq!(config.sync_command, DEFAULT_SYNC_COMMAND);
    assert!(config.local_path.is_absolute());
}

#[test]
fn resolve_honors_caller_overrides() {
    let _guard = lock();
    let fixture = Fixture::new();

    let overrides = Overrides {
        remote_url: Some("git@example.com:other.git".to_string()),
        branch: Some("release".to_string()),
        max_iterations: Some(3),
        interval: Some(Duration::from_millis(250)),
        background: true,
        sync_command: Some("git pull --rebase".to_string()),
    };
    let config = resolve(&fixture.local, overrides).expect("resolve");

    assert_eq!(config.remote_url, "git@example.com:other.git");
    assert_eq!(config.branch, "release");
    assert_eq!(config.max_iterations, 3);
    assert_eq!(config.interval, Duration::from_millis(250));
    assert!(config.background);
    assert_eq!(config.sync_command, "git pull --rebase");
}

#[test]
fn resolve_rejects_a_missing_path() {
    let _guard = lock();

    let err = resolve(
        Path::new("/nonexistent/autosync-fixture"),
        Overrides::default(),
    )
    .expect_err("missing path");

    assert!(matches!(err, AutosyncError::PathResolution { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn resolve_outside_a_repository_reports_config_missing() {
    let _guard = lock();
    let plain_dir = TempDir::new().expect("tempdir");

    let err = resolve(plain_dir.path(), Overrides::default()).expect_err("not a repository");

    assert!(matches!(
        err,
        AutosyncError::ConfigMissing { what: "remote URL" }
    ));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn detect_is_empty_when_local_matches_remote() {
    let _guard = lock();
    let fixture = Fixture::new();
    let before = env::current_dir().expect("cwd");

    let changes = detect::detect(&fixture.config()).expect("detect");

    assert!(changes.is_empty(), "clone starts up to date");
    assert_eq!(
        env::current_dir().expect("cwd"),
        before,
        "detection must leave the caller's directory untouched"
    );
}

#[test]
fn detect_lists_paths_when_remote_is_ahead() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.push_upstream("a.txt", "one commit ahead\n");

    let changes = detect::detect(&fixture.config()).expect("detect");

    assert_eq!(changes.paths(), &[PathBuf::from("a.txt")]);
}

#[test]
fn sync_pulls_the_remote_change() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.push_upstream("a.txt", "pull me\n");
    let config = fixture.config();

    let changes = detect::detect(&config).expect("detect before sync");
    assert!(!changes.is_empty());

    let report = syncer::sync(&config).expect("sync");
    assert_eq!(report.command, DEFAULT_SYNC_COMMAND);
    assert_eq!(
        fs::read_to_string(fixture.local.join("a.txt")).expect("pulled file"),
        "pull me\n"
    );

    let changes = detect::detect(&config).expect("detect after sync");
    assert!(changes.is_empty(), "sync should catch the local copy up");
}

#[test]
fn failing_sync_command_is_a_retryable_error() {
    let _guard = lock();
    let fixture = Fixture::new();
    let mut config = fixture.config();
    config.sync_command = "git pull --no-such-option".to_string();

    let err = syncer::sync(&config).expect_err("bad sync command");

    assert!(matches!(err, AutosyncError::SyncCommandFailed { .. }));
    assert_eq!(err.exit_code(), 8);
    assert!(!err.is_fatal(), "the loop retries a failed sync command");
}

#[test]
fn unreachable_remote_fails_detection_transiently_but_validation_fatally() {
    let _guard = lock();
    let fixture = Fixture::new();
    git(
        &fixture.local,
        &["remote", "set-url", "origin", "/nonexistent/autosync-origin.git"],
    );
    let config = fixture.config();

    let err = detect::detect(&config).expect_err("unreachable remote");
    assert!(matches!(err, AutosyncError::RemoteUnreachable { .. }));
    assert!(!err.is_fatal(), "mid-loop detection failures are retried");

    // The same failure during the Initializing pass aborts the invocation
    // before polling ever starts.
    let err = SyncLoop::new(config).start().expect_err("validation");
    assert!(matches!(err, AutosyncError::RemoteUnreachable { .. }));
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn loop_syncs_the_one_commit_ahead_remote_and_stops() {
    let _guard = lock();
    let fixture = Fixture::new();
    fixture.push_upstream("a.txt", "scenario\n");

    let mut config = fixture.config();
    config.max_iterations = 1;
    config.interval = Duration::from_millis(50);

    let handle = SyncLoop::new(config).start().expect("loop run");
    assert!(handle.is_none(), "foreground mode blocks until stopped");
    assert_eq!(
        fs::read_to_string(fixture.local.join("a.txt")).expect("pulled file"),
        "scenario\n"
    );

    // The origin kept the fixture's seed commit plus the pushed change.
    assert!(fixture.origin.join("HEAD").exists());
}
