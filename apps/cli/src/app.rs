//! Sync pipeline wiring: scan, connect, resolve, upload, report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use relsync_github::{Client, DEFAULT_BASE_URL, GitHubRelease};
use relsync_sync::types::DEFAULT_PARALLEL;
use relsync_sync::{
    SyncConfig, SyncError, SyncOrchestrator, SyncTarget, resolve_remote_ids, scan_local_assets,
};
use tracing::info;

use crate::cli::Cli;
use crate::config::Config;

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub path: PathBuf,
    pub token: String,
    pub api_url: String,
    pub target: SyncTarget,
    pub sync: SyncConfig,
}

impl Settings {
    /// Merges flags (and their env vars) over the config file over defaults.
    pub fn resolve(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let Some(token) = cli
            .token
            .clone()
            .or_else(|| config.token.clone())
            .filter(|t| !t.trim().is_empty())
        else {
            bail!("no GitHub token: pass --token, set GITHUB_TOKEN, or add `token` to the config file");
        };

        let parallel = match cli.parallel.or(config.parallel) {
            Some(p) => p as usize,
            None => DEFAULT_PARALLEL,
        };
        if parallel == 0 {
            bail!("parallel must be at least 1");
        }

        let api_url = cli
            .api_url
            .clone()
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            path: cli.path.clone(),
            token,
            api_url,
            target: SyncTarget::new(&cli.owner, &cli.repo, cli.release),
            sync: SyncConfig {
                parallel,
                replace: cli.replace || config.replace,
            },
        })
    }
}

/// Runs one sync. Returns `Ok(false)` if any asset reported an error.
///
/// Pre-flight failures (missing path, no assets, credentials, release
/// lookup, asset listing) are returned as errors before anything is sent.
pub async fn run(settings: Settings) -> anyhow::Result<bool> {
    let mut assets = scan_local_assets(&settings.path)?;

    let client = Client::new(&settings.token)
        .map_err(|e| SyncError::Auth(e.to_string()))?
        .with_base_url(&settings.api_url);
    let backend = Arc::new(
        GitHubRelease::connect(client, settings.target.clone())
            .await
            .with_context(|| format!("cannot sync to {}", settings.target))?,
    );

    let existing = resolve_remote_ids(&mut assets, backend.as_ref()).await?;
    info!(
        assets = assets.len(),
        existing,
        target_release = %settings.target,
        "reconciled with release"
    );

    let handle = SyncOrchestrator::new(settings.sync).start(assets, backend)?;
    let summary = handle
        .drain(|p| println!("--> {p}"), |e| eprintln!("{e}"))
        .await?;

    println!(
        "Done: {} uploaded, {} replaced, {} skipped, {} failed",
        summary.uploaded(),
        summary.replaced(),
        summary.skipped(),
        summary.failed()
    );

    Ok(summary.is_success())
}
