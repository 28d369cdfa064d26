mod cli;
mod commands;
mod render;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use explorer_core::config::{bootstrap_config, default_config_path, resolve_home_dir};
use explorer_core::{Explorer, ExplorerConfig};

const DEFAULT_LOG_FILTER: &str = "icd10_explorer=info,explorer_core=info";

/// Entry point for the ICD-10 / CPT explorer.
///
/// Resolves the home directory and configuration file, copying the bundled configuration
/// on first run, then loads every data file and runs one command.
///
/// # Environment Variables
/// - `ICD10_EXPLORER_CONFIG`: configuration file (default: `~/config.json`)
/// - `ICD10_USER` / `ICD10_PASSWORD`: login credentials
/// - `RUST_LOG`: log filter (default: `icd10_explorer=info,explorer_core=info`)
///
/// A `.env` file in the working directory is read first.
fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let home_dir = resolve_home_dir([std::env::var_os("HOME"), std::env::var_os("USERPROFILE")])?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&home_dir));
    let bootstrapped = bootstrap_config(&config_path)?;

    let config = match ExplorerConfig::load(&config_path, &home_dir) {
        Ok(config) => config,
        Err(err) => {
            init_logging(None)?;
            tracing::error!("{err}");
            eprintln!("Error: {err}\n{}", err.solution());
            return Ok(ExitCode::FAILURE);
        }
    };

    init_logging(Some(config.log_file()))?;
    if bootstrapped {
        tracing::info!("created {}", config_path.display());
    }

    let mut explorer = Explorer::open(config)?;
    match commands::dispatch(&mut explorer, &cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_validation() => {
            eprintln!("Error: {err}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("Error: {err}\n{}", err.solution());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Logs to stderr and, when it can be opened, to `log_file`.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    let file_opened = file.is_some();
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(path) = log_file.filter(|_| !file_opened) {
        tracing::warn!("could not open log file {}; logging to stderr only", path.display());
    }
    Ok(())
}
