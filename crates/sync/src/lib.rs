//! Release asset synchronization.
//!
//! This crate implements the **business logic** for pushing a set of
//! local files to a remote release. It has no HTTP dependency: the
//! caller provides a [`ReleaseBackend`] implementation that performs
//! the actual list/upload/delete calls.
//!
//! # Pipeline
//!
//! 1. **Scan** — turn a file or directory into candidate assets
//! 2. **Resolve** — attach remote IDs to candidates already on the release
//! 3. **Sync** — delete (when replacing) and upload every candidate with
//!    bounded parallelism, streaming progress and failures

pub mod backend;
pub mod error;
#[cfg(test)]
mod mock;
pub mod orchestrator;
pub mod resolver;
pub mod scanner;
pub mod types;

// Re-export primary types for convenience.
pub use backend::{BackendFuture, ReleaseBackend};
pub use error::{SyncError, TransferError};
pub use orchestrator::{SyncHandle, SyncOrchestrator};
pub use resolver::resolve_remote_ids;
pub use scanner::scan_local_assets;
pub use types::{
    Asset, AssetFailure, Operation, RemoteAsset, Step, SyncConfig, SyncOutcome, SyncProgress,
    SyncSummary, SyncTarget, UploadStatus,
};
