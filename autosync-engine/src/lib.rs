//! # autosync-engine
//!
//! The repository-facing half of git-autosync: the working-directory scope,
//! the git subprocess interface, configuration resolution, change detection,
//! the sync command runner, and the polling loop in foreground and
//! background modes.
//!
//! Call [`resolve`] to turn a path plus caller overrides into a full
//! [`RepoConfig`](autosync_core::RepoConfig), then hand it to
//! [`SyncLoop::start`].

pub mod config;
pub mod detect;
pub mod git;
pub mod runner;
pub mod syncer;
pub mod workdir;

pub use config::{resolve, Overrides};
pub use runner::{GitRepository, Repository, SyncLoop, LOG_PREFIX_ENV};
pub use workdir::{with_repo_dir, DirectoryScope};
