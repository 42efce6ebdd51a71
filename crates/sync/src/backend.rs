//! Release backend trait.
//!
//! `ReleaseBackend` is implemented on top of a concrete API client
//! (see `relsync-github`). Using a trait keeps the sync logic decoupled
//! from HTTP and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use crate::error::{SyncError, TransferError};
use crate::types::{Asset, RemoteAsset, SyncTarget, UploadStatus};

/// Boxed future returned by [`ReleaseBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Authenticated access to the assets of one release.
///
/// An implementation is bound to a single [`SyncTarget`] for the whole
/// run; anything that only needs resolving once (such as the upload
/// endpoint) is resolved when the backend is built, not per asset.
pub trait ReleaseBackend: Send + Sync {
    /// Returns the release this backend acts against.
    fn target(&self) -> &SyncTarget;

    /// Lists the assets already attached to the release.
    fn list_assets(&self) -> BackendFuture<'_, Result<Vec<RemoteAsset>, SyncError>>;

    /// Uploads one asset.
    ///
    /// Must return [`UploadStatus::SkippedEmpty`] without touching the
    /// network when the local file is zero bytes.
    fn upload<'a>(&'a self, asset: &'a Asset)
    -> BackendFuture<'a, Result<UploadStatus, TransferError>>;

    /// Deletes the remote asset identified by `asset.remote_id`.
    ///
    /// Fails with [`TransferError::MissingRemoteId`] when the asset is
    /// not known remotely.
    fn delete<'a>(&'a self, asset: &'a Asset) -> BackendFuture<'a, Result<(), TransferError>>;
}
