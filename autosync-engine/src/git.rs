//! Thin wrappers over the `git` binary.
//!
//! All functions run against the process working directory; callers enter
//! the repository first via [`with_repo_dir`](crate::workdir::with_repo_dir).
//! The tool itself is an opaque collaborator — only exit status, stdout for
//! the queries and the diff, and stderr folded into error context are
//! interpreted.

use std::path::PathBuf;
use std::process::{Command, Output};

use autosync_core::{AutosyncError, ChangeSet};

/// Remote addressed by detection and sync — the same remote the resolution
/// query reads.
pub const REMOTE_NAME: &str = "origin";

fn run_git(args: &[&str]) -> std::io::Result<Output> {
    Command::new("git").args(args).output()
}

/// Run a read-only query, returning trimmed stdout on zero exit.
fn query(args: &[&str]) -> Option<String> {
    let output = run_git(args).ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// First stderr line of a failed invocation, or the exit status when git
/// said nothing.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(line) => line.to_string(),
        None => format!("exit status {}", output.status),
    }
}

/// The configured remote URL, from `git config --get remote.origin.url`.
///
/// An unset or empty value is [`AutosyncError::ConfigMissing`] — resolution
/// never accepts a silent empty URL.
pub fn remote_url() -> Result<String, AutosyncError> {
    match query(&["config", "--get", "remote.origin.url"]) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(AutosyncError::ConfigMissing { what: "remote URL" }),
    }
}

/// The current branch name, from `git rev-parse --abbrev-ref HEAD`.
pub fn current_branch() -> Result<String, AutosyncError> {
    match query(&["rev-parse", "--abbrev-ref", "HEAD"]) {
        Some(branch) if !branch.is_empty() => Ok(branch),
        _ => Err(AutosyncError::ConfigMissing { what: "branch" }),
    }
}

/// Refresh remote tracking data via `git remote update`.
///
/// Any failure is [`AutosyncError::RemoteUnreachable`] — transient from the
/// loop's point of view, and the diff must not be attempted after it.
pub fn update_remote() -> Result<(), AutosyncError> {
    let output = run_git(&["remote", "update"]).map_err(|err| {
        AutosyncError::RemoteUnreachable {
            detail: err.to_string(),
        }
    })?;
    if !output.status.success() {
        return Err(AutosyncError::RemoteUnreachable {
            detail: failure_detail(&output),
        });
    }
    Ok(())
}

/// Paths differing between `branch` and `origin/<branch>`, via
/// `git diff --name-only`.
pub fn changed_paths(branch: &str) -> Result<ChangeSet, AutosyncError> {
    let reference = format!("{REMOTE_NAME}/{branch}");
    let output = run_git(&["diff", "--name-only", branch, &reference]).map_err(|err| {
        AutosyncError::DiffFailure {
            reference: reference.clone(),
            detail: err.to_string(),
        }
    })?;
    if !output.status.success() {
        return Err(AutosyncError::DiffFailure {
            reference,
            detail: failure_detail(&output),
        });
    }
    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `--name-only` output: one path per line, blanks dropped, order
/// preserved.
fn parse_name_only(stdout: &str) -> ChangeSet {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
