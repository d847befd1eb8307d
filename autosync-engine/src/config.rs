//! Configuration resolution: caller overrides plus defaults pulled from the
//! repository's own remote and branch configuration.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use autosync_core::{AutosyncError, RepoConfig};

use crate::git;
use crate::workdir::with_repo_dir;

/// Caller-supplied overrides. Unset fields resolve from the repository or
/// fall back to the documented defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub remote_url: Option<String>,
    pub branch: Option<String>,
    pub max_iterations: Option<i64>,
    pub interval: Option<Duration>,
    pub background: bool,
    pub sync_command: Option<String>,
}

/// Resolve a full [`RepoConfig`] for the repository at `local_path`.
///
/// The path is canonicalized and must be an existing directory
/// ([`AutosyncError::PathResolution`] otherwise). Remote URL and branch are
/// queried from the repository itself when not overridden, inside the
/// directory scope; an empty answer is [`AutosyncError::ConfigMissing`],
/// never silently accepted.
pub fn resolve(local_path: &Path, overrides: Overrides) -> Result<RepoConfig, AutosyncError> {
    let local_path =
        fs::canonicalize(local_path).map_err(|source| AutosyncError::PathResolution {
            path: local_path.to_path_buf(),
            source,
        })?;
    if !local_path.is_dir() {
        return Err(AutosyncError::PathResolution {
            path: local_path,
            source: io::Error::other("not a directory"),
        });
    }

    if let Some(command) = &overrides.sync_command {
        if command.split_whitespace().next().is_none() {
            return Err(AutosyncError::InvalidArgument {
                message: "sync command is empty".to_string(),
            });
        }
    }

    let (remote_url, branch) = with_repo_dir(&local_path, || {
        let remote_url = match &overrides.remote_url {
            Some(url) => url.clone(),
            None => git::remote_url()?,
        };
        let branch = match &overrides.branch {
            Some(branch) => branch.clone(),
            None => git::current_branch()?,
        };
        Ok((remote_url, branch))
    })?;

    let mut config = RepoConfig::with_defaults(local_path, remote_url, branch);
    if let Some(max_iterations) = overrides.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(interval) = overrides.interval {
        config.interval = interval;
    }
    if let Some(sync_command) = overrides.sync_command {
        config.sync_command = sync_command;
    }
    config.background = overrides.background;
    Ok(config)
}
