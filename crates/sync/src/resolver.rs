//! Remote reconciliation.
//!
//! Matches candidates against the assets already on the release by exact
//! name and records the remote ID on each match.

use tracing::debug;

use crate::backend::ReleaseBackend;
use crate::error::SyncError;
use crate::types::Asset;

/// Sets `remote_id` on every candidate whose name is already on the release.
///
/// Remote assets with no local counterpart are ignored. If the release
/// lists a name twice, the last entry wins. A listing failure aborts
/// before any candidate is touched, so nothing is half-resolved.
///
/// Returns the number of candidates that matched.
pub async fn resolve_remote_ids(
    assets: &mut [Asset],
    backend: &dyn ReleaseBackend,
) -> Result<usize, SyncError> {
    let remote = backend.list_assets().await?;

    debug!(
        target_release = %backend.target(),
        remote = remote.len(),
        local = assets.len(),
        "listed remote assets"
    );

    for ra in &remote {
        for asset in assets.iter_mut().filter(|a| a.name == ra.name) {
            asset.remote_id = Some(ra.id);
        }
    }

    Ok(assets.iter().filter(|a| a.is_remote()).count())
}
