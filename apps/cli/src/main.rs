//! relsync entry point.

mod app;
mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so they never mix with the progress lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli::default_log_level(cli.verbose))),
        )
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting relsync");

    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    let settings = app::Settings::resolve(&cli, &config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let clean = rt.block_on(app::run(settings))?;

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}
