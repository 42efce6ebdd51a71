//! GitHub release asset client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use std::path::Path;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::types::{Release, ReleaseAsset};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Page size used when listing assets (GitHub's maximum).
const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// Errors from the GitHub client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to get file info: {0}")]
    FileInfo(String),

    #[error("failed to open file: {0}")]
    OpenFile(String),

    #[error("invalid API token")]
    InvalidToken,
}

impl Error {
    /// True for credential problems, as opposed to request failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::InvalidToken)
    }
}

/// Result of an upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Created(ReleaseAsset),
    /// The file is empty and was not sent. GitHub rejects empty assets.
    Skipped,
}

/// GitHub REST API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client authenticated with the given token.
    pub fn new(token: &str) -> Result<Self, Error> {
        if token.trim().is_empty() {
            return Err(Error::InvalidToken);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|_| Error::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("relsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom API base URL (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs an authenticated GET and decodes a JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self.http.get(&url).query(params).send().await?;
        let resp = check_status(resp, StatusCode::OK).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Fetches a release by ID.
    pub async fn get_release(&self, owner: &str, repo: &str, id: u64) -> Result<Release, Error> {
        self.get_json(&format!("/repos/{owner}/{repo}/releases/{id}"), &[])
            .await
    }

    /// Returns the upload endpoint of a release, with the URI template
    /// suffix removed.
    pub async fn release_upload_url(
        &self,
        owner: &str,
        repo: &str,
        id: u64,
    ) -> Result<String, Error> {
        let release = self.get_release(owner, repo, id).await?;
        Ok(extract_upload_url(&release.upload_url))
    }

    /// Lists every asset of a release, following pagination.
    pub async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        id: u64,
    ) -> Result<Vec<ReleaseAsset>, Error> {
        let endpoint = format!("/repos/{owner}/{repo}/releases/{id}/assets");
        let mut assets = Vec::new();

        for page in 1.. {
            let batch: Vec<ReleaseAsset> = self
                .get_json(
                    &endpoint,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                )
                .await?;
            let last = batch.len() < PER_PAGE;
            assets.extend(batch);
            if last {
                break;
            }
        }

        debug!(owner, repo, release = id, count = assets.len(), "listed release assets");
        Ok(assets)
    }

    /// Streams a local file to the release's upload endpoint.
    ///
    /// Empty files are not sent; the call returns [`UploadResult::Skipped`]
    /// without any network traffic.
    pub async fn upload_release_asset(
        &self,
        upload_url: &str,
        name: &str,
        path: &Path,
    ) -> Result<UploadResult, Error> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::FileInfo(format!("{name}: {e}")))?;
        if meta.len() == 0 {
            warn!(asset = name, "GitHub does not allow empty files, skipping");
            return Ok(UploadResult::Skipped);
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::OpenFile(format!("{name}: {e}")))?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let resp = self
            .http
            .post(upload_url)
            .query(&[("name", name)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, meta.len())
            .body(body)
            .send()
            .await?;
        let resp = check_status(resp, StatusCode::CREATED).await?;

        let asset: ReleaseAsset = serde_json::from_slice(&resp.bytes().await?)?;
        debug!(asset = name, id = asset.id, bytes = meta.len(), "asset uploaded");
        Ok(UploadResult::Created(asset))
    }

    /// Deletes a release asset by ID.
    pub async fn delete_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> Result<(), Error> {
        let url = format!(
            "{}/repos/{owner}/{repo}/releases/assets/{asset_id}",
            self.base_url
        );
        let resp = self.http.delete(&url).send().await?;
        check_status(resp, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

/// Strips the RFC 6570 suffix from a release `upload_url`.
///
/// `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`
/// becomes `https://uploads.github.com/repos/o/r/releases/1/assets`.
pub fn extract_upload_url(template: &str) -> String {
    match template.find('{') {
        Some(idx) => template[..idx].to_string(),
        None => template.to_string(),
    }
}

/// Maps a response to an error unless it carries the expected status.
async fn check_status(
    resp: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status == expected {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
            status: status.as_u16(),
            body,
        },
        StatusCode::NOT_FOUND => Error::NotFound(body),
        _ => Error::Api {
            status: status.as_u16(),
            body,
        },
    })
}
