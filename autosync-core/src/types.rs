//! Domain types for the autosync engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. None of these types persist anywhere — every value lives for one
//! invocation and dies with it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Default sleep between polling ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default sync command. Split on whitespace before execution; no shell.
pub const DEFAULT_SYNC_COMMAND: &str = "git pull";

/// Sentinel iteration bound meaning "poll forever".
pub const UNBOUNDED: i64 = -1;

// ---------------------------------------------------------------------------
// RepoConfig
// ---------------------------------------------------------------------------

/// Fully resolved configuration for one autosync invocation.
///
/// Resolution guarantees `local_path` is absolute and was an existing
/// directory at resolution time, and that `remote_url` and `branch` are
/// non-empty — either caller-supplied or read from the repository itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Absolute path to the local working copy.
    pub local_path: PathBuf,
    /// URL of the tracked remote, from `remote.origin.url` when not given.
    pub remote_url: String,
    /// Branch compared against its `origin/<branch>` counterpart.
    pub branch: String,
    /// Ticks to complete before stopping; non-positive means unbounded.
    pub max_iterations: i64,
    /// Sleep between ticks.
    pub interval: Duration,
    /// Hand the polling loop to a background thread after validation.
    pub background: bool,
    /// Command executed when the remote has diverged.
    pub sync_command: String,
}

impl RepoConfig {
    /// A config with defaults for everything the caller did not resolve:
    /// unbounded iterations, 5s interval, `git pull`, foreground.
    pub fn with_defaults(local_path: PathBuf, remote_url: String, branch: String) -> Self {
        Self {
            local_path,
            remote_url,
            branch,
            max_iterations: UNBOUNDED,
            interval: DEFAULT_INTERVAL,
            background: false,
            sync_command: DEFAULT_SYNC_COMMAND.to_string(),
        }
    }

    /// Whether the iteration bound is armed. Zero behaves like the
    /// [`UNBOUNDED`] sentinel.
    pub fn bounded(&self) -> bool {
        self.max_iterations > 0
    }
}

// ---------------------------------------------------------------------------
// ChangeSet
// ---------------------------------------------------------------------------

/// Paths that differ between the local and remote branch tips at one
/// detection pass.
///
/// Empty means "already up to date" — a valid, non-error outcome. A
/// ChangeSet has no identity beyond the pass that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FromIterator<PathBuf> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ChangeSet {
    /// Log-friendly preview: first three paths, then a count of the rest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 3;
        let mut shown = 0;
        for path in self.paths.iter().take(PREVIEW) {
            if shown > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", path.display())?;
            shown += 1;
        }
        if self.paths.len() > PREVIEW {
            write!(f, " (+{} more)", self.paths.len() - PREVIEW)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// Outcome of one successful sync command run, logged by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// The command that ran, as configured.
    pub command: String,
    /// Wall-clock completion time.
    pub completed_at: DateTime<Local>,
}
