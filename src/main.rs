mod archive;
mod cli;
mod command_handlers;
mod config;
mod download;
mod error;
mod manager;
mod platform;
mod plugin;
mod toolversions;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::{Paths, Settings};
use crate::download::Downloader;
use crate::manager::hooks::ShellHookRunner;
use crate::manager::Manager;
use crate::plugin::Registry;

const LOG_ENV: &str = "ARSENAL_LOG";

fn init_logging(verbose: bool) {
    let default = if verbose { "arsenal=debug" } else { "arsenal=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let paths = Paths::resolve(cli.root.as_deref())?;
    paths
        .ensure_dirs()
        .with_context(|| format!("preparing {}", paths.root.display()))?;
    let settings = Settings::load(&paths.config)?;
    let registry = Registry::load(&paths)?;
    tracing::debug!("arsenal root {}", paths.root.display());

    let manager = Manager::new(
        paths,
        registry,
        Downloader::new(settings.quiet_downloads)?,
        Box::new(ShellHookRunner),
    );
    command_handlers::dispatch::dispatch(cli.command, &manager, &settings)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
