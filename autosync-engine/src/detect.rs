//! Change detection between the local branch tip and its remote
//! counterpart.

use autosync_core::{AutosyncError, ChangeSet, RepoConfig};

use crate::git;
use crate::workdir::with_repo_dir;

/// One detection pass: refresh remote tracking data, then diff the local
/// branch tip against `origin/<branch>`.
///
/// Failures are transient from the loop's point of view —
/// [`AutosyncError::RemoteUnreachable`] when the tracking refresh fails
/// (the diff is not attempted), [`AutosyncError::DiffFailure`] when the
/// comparison cannot be computed. An empty [`ChangeSet`] is a valid
/// non-error outcome meaning the local copy is already up to date.
pub fn detect(config: &RepoConfig) -> Result<ChangeSet, AutosyncError> {
    with_repo_dir(&config.local_path, || {
        git::update_remote()?;
        git::changed_paths(&config.branch)
    })
}
