//! Local asset discovery.
//!
//! A regular file path yields that single file; a directory yields the regular
//! files directly inside it. Subdirectories are skipped, never walked.

use std::path::Path;

use tracing::debug;

use crate::error::SyncError;
use crate::types::Asset;

/// Scans `path` and returns the candidate assets, sorted by name.
///
/// Symlinks are followed, so a link to a regular file is a candidate.
pub fn scan_local_assets(path: &Path) -> Result<Vec<Asset>, SyncError> {
    let metadata =
        std::fs::metadata(path).map_err(|_| SyncError::NotFound(path.to_path_buf()))?;

    if metadata.is_file() {
        return Ok(vec![Asset::new(path.to_path_buf(), base_name(path))]);
    }
    if !metadata.is_dir() {
        // FIFOs, sockets, and device nodes are not uploadable.
        return Err(SyncError::NoAssets(path.to_path_buf()));
    }

    let mut assets = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        // Dangling links have no metadata; treat them like non-files.
        let Ok(meta) = std::fs::metadata(&entry_path) else {
            debug!(path = %entry_path.display(), "skipping unreadable entry");
            continue;
        };
        if !meta.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        assets.push(Asset::new(entry_path, name));
    }

    if assets.is_empty() {
        return Err(SyncError::NoAssets(path.to_path_buf()));
    }

    assets.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %path.display(), count = assets.len(), "scan complete");
    Ok(assets)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
