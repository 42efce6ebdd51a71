//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

/// Upload local files as assets of an existing GitHub release.
#[derive(Parser, Debug)]
#[command(name = "relsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to upload (directories are not walked recursively)
    pub path: PathBuf,

    /// GitHub API token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository owner
    #[arg(short = 'u', long)]
    pub owner: String,

    /// Repository name
    #[arg(short, long)]
    pub repo: String,

    /// Numeric release ID
    #[arg(long)]
    pub release: u64,

    /// Number of assets uploaded at once
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub parallel: Option<u32>,

    /// Delete existing assets with the same name before uploading
    #[arg(long)]
    pub replace: bool,

    /// API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API")]
    pub api_url: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
