//! The polling loop: detect, sync when diverged, wait, repeat.
//!
//! One validation pass (`Initializing`) precedes the loop; its failure is a
//! configuration error and is never retried. Inside the loop, transient
//! errors are logged and retried after the interval without advancing the
//! iteration count. The loop runs on the calling thread, or — in
//! background mode — on one detached thread after validation succeeds.

use std::env;
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};

use tracing::{error, info, warn};

use autosync_core::{AutosyncError, ChangeSet, RepoConfig, SyncReport};

use crate::{detect, syncer};

/// Environment variable overriding the `prefix` field attached to every
/// loop event.
pub const LOG_PREFIX_ENV: &str = "AUTOSYNC_LOG_PREFIX";

const DEFAULT_LOG_PREFIX: &str = "autosync";

fn log_prefix() -> &'static str {
    static PREFIX: OnceLock<String> = OnceLock::new();
    PREFIX.get_or_init(|| {
        env::var(LOG_PREFIX_ENV).unwrap_or_else(|_| DEFAULT_LOG_PREFIX.to_string())
    })
}

/// Seam between the loop and the repository operations, so the loop
/// discipline is testable without a live repository.
pub trait Repository {
    /// One detection pass; empty means up to date.
    fn detect(&self, config: &RepoConfig) -> Result<ChangeSet, AutosyncError>;

    /// Run the configured sync command.
    fn sync(&self, config: &RepoConfig) -> Result<SyncReport, AutosyncError>;
}

/// The real repository: shells out to git inside the directory scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepository;

impl Repository for GitRepository {
    fn detect(&self, config: &RepoConfig) -> Result<ChangeSet, AutosyncError> {
        detect::detect(config)
    }

    fn sync(&self, config: &RepoConfig) -> Result<SyncReport, AutosyncError> {
        syncer::sync(config)
    }
}

/// Loop-lifetime bookkeeping, reported in the stop log line and destroyed
/// when the loop exits.
#[derive(Debug, Default)]
struct LoopState {
    iterations: i64,
    last_error: Option<i32>,
}

/// The sync loop: validates once, then repeats detect → sync → wait until
/// the iteration bound is reached.
pub struct SyncLoop<R: Repository> {
    config: RepoConfig,
    repo: R,
}

impl SyncLoop<GitRepository> {
    pub fn new(config: RepoConfig) -> Self {
        Self::with_repository(config, GitRepository)
    }
}

impl<R: Repository + Send + 'static> SyncLoop<R> {
    /// A loop over a substitute [`Repository`] implementation.
    pub fn with_repository(config: RepoConfig, repo: R) -> Self {
        Self { config, repo }
    }

    /// Run to completion, honoring `config.background`.
    ///
    /// Foreground: blocks until the loop stops, returning `Ok(None)`.
    /// Background: performs the validation pass on the calling thread —
    /// fatal errors surface synchronously — then hands the loop to a
    /// detached thread and returns its join handle immediately. The handle
    /// is an observation handle only; the sole cancellation primitive is
    /// process termination.
    pub fn start(self) -> Result<Option<JoinHandle<Result<(), AutosyncError>>>, AutosyncError> {
        self.validate()?;
        if self.config.background {
            let handle = thread::spawn(move || {
                let result = self.poll();
                if let Err(err) = &result {
                    error!(prefix = %log_prefix(), error = %err, "background loop terminated");
                }
                result
            });
            Ok(Some(handle))
        } else {
            self.poll()?;
            Ok(None)
        }
    }

    /// `Initializing`: one detection pass purely to validate the
    /// configuration — remote reachable, branch resolvable. A failure here
    /// is a configuration error, not a transient blip: fatal, never
    /// retried, and the loop is never entered.
    fn validate(&self) -> Result<(), AutosyncError> {
        self.repo.detect(&self.config)?;
        info!(
            prefix = %log_prefix(),
            repo = %self.config.local_path.display(),
            url = %self.config.remote_url,
            branch = %self.config.branch,
            "configuration validated, remote reachable"
        );
        Ok(())
    }

    fn poll(&self) -> Result<(), AutosyncError> {
        let mut state = LoopState::default();
        loop {
            // The bound check runs before this tick's detection, and every
            // non-failing tick increments: the loop sleeps one extra
            // interval after the final counted tick before observing the
            // bound.
            if self.config.bounded() && state.iterations >= self.config.max_iterations {
                break;
            }
            match self.tick(&mut state) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    state.last_error = Some(err.exit_code());
                    warn!(
                        prefix = %log_prefix(),
                        error = %err,
                        "tick failed, retrying after interval"
                    );
                }
            }
            thread::sleep(self.config.interval);
        }
        info!(
            prefix = %log_prefix(),
            iterations = state.iterations,
            last_error = state.last_error,
            "iteration bound reached, stopping"
        );
        Ok(())
    }

    /// One polling tick: detect, sync when diverged, account the iteration.
    /// Transient errors bubble to [`poll`](Self::poll), which waits and
    /// retries without advancing the count.
    fn tick(&self, state: &mut LoopState) -> Result<(), AutosyncError> {
        let changes = self.repo.detect(&self.config)?;
        if !changes.is_empty() {
            let report = self.repo.sync(&self.config)?;
            info!(
                prefix = %log_prefix(),
                files = changes.len(),
                changed = %changes,
                command = %report.command,
                completed_at = %report.completed_at.format("%Y-%m-%d %H:%M:%S"),
                "sync completed"
            );
        }
        state.iterations += 1;
        Ok(())
    }
}
