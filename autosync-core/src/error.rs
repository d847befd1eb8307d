//! Error taxonomy for autosync operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from autosync operations.
///
/// Configuration-phase errors ([`InvalidArgument`](AutosyncError::InvalidArgument),
/// [`PathResolution`](AutosyncError::PathResolution),
/// [`ConfigMissing`](AutosyncError::ConfigMissing)) abort the invocation.
/// Runtime-phase errors are logged by the loop and retried on the next
/// tick. [`DirectoryAccess`](AutosyncError::DirectoryAccess) is fatal in
/// every phase — it means the process may be stranded outside the caller's
/// directory, which invalidates all subsequent relative operations.
#[derive(Debug, Error)]
pub enum AutosyncError {
    /// A caller-supplied option failed validation before resolution.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The local path does not resolve to an existing directory.
    #[error("cannot resolve repository path {path}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The repository resolved an empty remote URL or branch name.
    #[error("repository has no {what} configured")]
    ConfigMissing { what: &'static str },

    /// Changing into the repository directory, or back out of it, failed.
    #[error("cannot change working directory to {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Refreshing remote tracking data failed; retried on the next tick.
    #[error("remote update failed: {detail}")]
    RemoteUnreachable { detail: String },

    /// Comparing local and remote branch tips failed; retried on the next tick.
    #[error("diff against {reference} failed: {detail}")]
    DiffFailure { reference: String, detail: String },

    /// The configured sync command exited nonzero; retried on the next tick.
    #[error("sync command `{command}` failed: {detail}")]
    SyncCommandFailed { command: String, detail: String },
}

impl AutosyncError {
    /// Stable numeric code, returned as the process exit status when the
    /// error is fatal to the invocation.
    pub fn exit_code(&self) -> i32 {
        match self {
            AutosyncError::InvalidArgument { .. } => 2,
            AutosyncError::PathResolution { .. } => 3,
            AutosyncError::ConfigMissing { .. } => 4,
            AutosyncError::DirectoryAccess { .. } => 5,
            AutosyncError::RemoteUnreachable { .. } => 6,
            AutosyncError::DiffFailure { .. } => 7,
            AutosyncError::SyncCommandFailed { .. } => 8,
        }
    }

    /// Whether the loop must terminate on this error instead of logging it
    /// and retrying after the interval.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AutosyncError::InvalidArgument { .. }
                | AutosyncError::PathResolution { .. }
                | AutosyncError::ConfigMissing { .. }
                | AutosyncError::DirectoryAccess { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn io_missing() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "no such file or directory")
    }

    #[rstest]
    #[case::invalid_argument(
        AutosyncError::InvalidArgument { message: "interval must be positive".into() },
        2,
        true
    )]
    #[case::path_resolution(
        AutosyncError::PathResolution { path: PathBuf::from("/missing"), source: io_missing() },
        3,
        true
    )]
    #[case::config_missing(AutosyncError::ConfigMissing { what: "remote URL" }, 4, true)]
    #[case::directory_access(
        AutosyncError::DirectoryAccess { path: PathBuf::from("/repo"), source: io_missing() },
        5,
        true
    )]
    #[case::remote_unreachable(
        AutosyncError::RemoteUnreachable { detail: "could not resolve host".into() },
        6,
        false
    )]
    #[case::diff_failure(
        AutosyncError::DiffFailure { reference: "origin/main".into(), detail: "bad revision".into() },
        7,
        false
    )]
    #[case::sync_command_failed(
        AutosyncError::SyncCommandFailed { command: "git pull".into(), detail: "exit status 1".into() },
        8,
        false
    )]
    fn exit_codes_and_retry_policy(
        #[case] err: AutosyncError,
        #[case] code: i32,
        #[case] fatal: bool,
    ) {
        assert_eq!(err.exit_code(), code);
        assert_eq!(err.is_fatal(), fatal);
    }

    #[test]
    fn messages_carry_operation_context() {
        let err = AutosyncError::SyncCommandFailed {
            command: "git pull --rebase".into(),
            detail: "exit status 128".into(),
        };
        assert_eq!(
            err.to_string(),
            "sync command `git pull --rebase` failed: exit status 128"
        );

        let err = AutosyncError::DiffFailure {
            reference: "origin/main".into(),
            detail: "unknown revision".into(),
        };
        assert_eq!(
            err.to_string(),
            "diff against origin/main failed: unknown revision"
        );
    }
}
