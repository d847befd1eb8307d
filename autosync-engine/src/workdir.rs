//! Scoped working-directory handling for repository operations.
//!
//! Every git invocation runs relative to the process working directory,
//! which is process-global mutable state. [`DirectoryScope`] captures the
//! caller's directory on entry and restores it on exit; [`with_repo_dir`]
//! is the structured form that restores on every exit path, error paths
//! included. The discipline is sound only while exactly one loop mutates
//! the directory — concurrent loops over one repository are undefined.

use std::env;
use std::path::{Path, PathBuf};

use autosync_core::AutosyncError;

/// The caller's working directory, captured before entering the repository.
///
/// Owned exclusively by the operation that created it and consumed exactly
/// once by [`leave`](DirectoryScope::leave); it never outlives a single
/// operation.
#[derive(Debug)]
pub struct DirectoryScope {
    previous: PathBuf,
}

impl DirectoryScope {
    /// Change into `path`, remembering the current directory.
    ///
    /// Failure to enter is [`AutosyncError::DirectoryAccess`]; the caller
    /// must abort the repository operation without attempting it.
    pub fn enter(path: &Path) -> Result<Self, AutosyncError> {
        let previous = env::current_dir().map_err(|source| AutosyncError::DirectoryAccess {
            path: path.to_path_buf(),
            source,
        })?;
        env::set_current_dir(path).map_err(|source| AutosyncError::DirectoryAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { previous })
    }

    /// Restore the directory captured at [`enter`](Self::enter) time.
    ///
    /// A restore failure must propagate, never be swallowed — the process
    /// would be stranded in the wrong directory.
    pub fn leave(self) -> Result<(), AutosyncError> {
        env::set_current_dir(&self.previous).map_err(|source| AutosyncError::DirectoryAccess {
            path: self.previous.clone(),
            source,
        })
    }
}

/// Run `op` with the working directory set to `path`, restoring the
/// caller's directory afterwards on success and failure alike.
///
/// When both `op` and the restore fail, the restore error wins: a process
/// in the wrong directory invalidates every relative operation after it.
pub fn with_repo_dir<T>(
    path: &Path,
    op: impl FnOnce() -> Result<T, AutosyncError>,
) -> Result<T, AutosyncError> {
    let scope = DirectoryScope::enter(path)?;
    let result = op();
    scope.leave()?;
    result
}
