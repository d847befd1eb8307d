//! Autosync core library — domain types and the error taxonomy.
//!
//! Public API surface:
//! - [`types`] — [`RepoConfig`], [`ChangeSet`], [`SyncReport`], defaults
//! - [`error`] — [`AutosyncError`]

pub mod error;
pub mod types;

pub use error::AutosyncError;
pub use types::{
    ChangeSet, RepoConfig, SyncReport, DEFAULT_INTERVAL, DEFAULT_SYNC_COMMAND, UNBOUNDED,
};
