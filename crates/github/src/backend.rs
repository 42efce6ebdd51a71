//! [`ReleaseBackend`] implementation over the GitHub client.
//!
//! This is where GitHub errors are classified into the sync error
//! taxonomy: credential failures become `Auth`, everything else on the
//! listing path becomes `RemoteList`, and per-asset failures become
//! `TransferError`s.

use relsync_sync::{
    Asset, BackendFuture, ReleaseBackend, RemoteAsset, SyncError, SyncTarget, TransferError,
    UploadStatus,
};
use tracing::debug;

use crate::client::{Client, Error, UploadResult};

/// GitHub-backed access to one release.
pub struct GitHubRelease {
    client: Client,
    target: SyncTarget,
    upload_url: String,
}

impl GitHubRelease {
    /// Binds the client to a release and resolves its upload endpoint.
    ///
    /// The endpoint is fetched once here and shared by every upload.
    pub async fn connect(client: Client, target: SyncTarget) -> Result<Self, SyncError> {
        let upload_url = client
            .release_upload_url(&target.owner, &target.repo, target.release_id)
            .await
            .map_err(|e| match e {
                e if e.is_auth() => SyncError::Auth(e.to_string()),
                e => SyncError::Release(e.to_string()),
            })?;

        debug!(target_release = %target, upload_url = %upload_url, "resolved upload endpoint");
        Ok(Self {
            client,
            target,
            upload_url,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

impl ReleaseBackend for GitHubRelease {
    fn target(&self) -> &SyncTarget {
        &self.target
    }

    fn list_assets(&self) -> BackendFuture<'_, Result<Vec<RemoteAsset>, SyncError>> {
        Box::pin(async move {
            let assets = self
                .client
                .list_release_assets(&self.target.owner, &self.target.repo, self.target.release_id)
                .await
                .map_err(|e| {
                    if e.is_auth() {
                        SyncError::Auth(e.to_string())
                    } else {
                        SyncError::RemoteList(e.to_string())
                    }
                })?;

            Ok(assets
                .into_iter()
                .map(|a| RemoteAsset {
                    id: a.id,
                    name: a.name,
                    size: a.size,
                })
                .collect())
        })
    }

    fn upload<'a>(
        &'a self,
        asset: &'a Asset,
    ) -> BackendFuture<'a, Result<UploadStatus, TransferError>> {
        Box::pin(async move {
            let result = self
                .client
                .upload_release_asset(&self.upload_url, &asset.name, &asset.path)
                .await
                .map_err(|e| match e {
                    Error::FileInfo(msg) => TransferError::Stat(msg),
                    Error::OpenFile(msg) => TransferError::Open(msg),
                    other => TransferError::Upload(other.to_string()),
                })?;

            Ok(match result {
                UploadResult::Created(_) => UploadStatus::Uploaded,
                UploadResult::Skipped => UploadStatus::SkippedEmpty,
            })
        })
    }

    fn delete<'a>(&'a self, asset: &'a Asset) -> BackendFuture<'a, Result<(), TransferError>> {
        Box::pin(async move {
            let id = asset
                .remote_id
                .ok_or_else(|| TransferError::MissingRemoteId(asset.name.clone()))?;

            self.client
                .delete_release_asset(&self.target.owner, &self.target.repo, id)
                .await
                .map_err(|e| TransferError::Delete(e.to_string()))
        })
    }
}
