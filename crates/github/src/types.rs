//! GitHub API response types.

use serde::Deserialize;

/// A release, reduced to the fields the sync needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    /// RFC 6570 template, e.g. `https://uploads.github.com/.../assets{?name,label}`.
    pub upload_url: String,
}

/// An asset attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub state: String,
}
