//! Sync error types.

use std::path::PathBuf;

/// Pre-flight errors that abort a sync run before any transfer starts.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no assets to upload in {}", .0.display())]
    NoAssets(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to list remote assets: {0}")]
    RemoteList(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("failed to resolve release: {0}")]
    Release(String),

    #[error("duplicate asset name: {0}")]
    DuplicateAsset(String),

    #[error("parallelism must be at least 1")]
    InvalidParallelism,

    #[error("sync run ended without a completion signal")]
    Interrupted,
}

/// Per-asset errors raised by a [`ReleaseBackend`](crate::ReleaseBackend).
///
/// These never abort the run; the orchestrator reports them on the
/// error stream and moves on.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to get file info: {0}")]
    Stat(String),

    #[error("failed to open file: {0}")]
    Open(String),

    #[error("asset {0} has no remote ID")]
    MissingRemoteId(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("upload failed: {0}")]
    Upload(String),
}
