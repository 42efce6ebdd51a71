//! GitHub release API client.
//!
//! Provides an async client for the release asset endpoints of the
//! [GitHub REST API](https://docs.github.com/en/rest/releases/assets)
//! and a [`GitHubRelease`] adapter implementing
//! [`relsync_sync::ReleaseBackend`].

pub mod backend;
pub mod client;
#[cfg(test)]
mod test_server;
pub mod types;

pub use backend::GitHubRelease;
pub use client::{Client, DEFAULT_BASE_URL, Error, UploadResult, extract_upload_url};
pub use types::{Release, ReleaseAsset};
