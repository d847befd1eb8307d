//! Sync command execution.

use std::process::Command;

use chrono::Local;

use autosync_core::{AutosyncError, RepoConfig, SyncReport};

use crate::git;
use crate::workdir::with_repo_dir;

/// Run the configured sync command inside the repository.
///
/// The command string is split on whitespace into an argument vector and
/// spawned directly — no shell, so quoting and expansion are not available.
/// That split is the one documented "raw command string" rule. Nonzero exit
/// maps to [`AutosyncError::SyncCommandFailed`] carrying the command text
/// and captured stderr.
pub fn sync(config: &RepoConfig) -> Result<SyncReport, AutosyncError> {
    let argv: Vec<&str> = config.sync_command.split_whitespace().collect();
    let Some((program, args)) = argv.split_first() else {
        return Err(AutosyncError::InvalidArgument {
            message: "sync command is empty".to_string(),
        });
    };

    with_repo_dir(&config.local_path, || {
        let output = Command::new(program).args(args).output().map_err(|err| {
            AutosyncError::SyncCommandFailed {
                command: config.sync_command.clone(),
                detail: err.to_string(),
            }
        })?;
        if !output.status.success() {
            return Err(AutosyncError::SyncCommandFailed {
                command: config.sync_command.clone(),
                detail: git::failure_detail(&output),
            });
        }
        Ok(SyncReport {
            command: config.sync_command.clone(),
            completed_at: Local::now(),
        })
    })
}
