//! wallet-store - inspect and maintain a wallet persistence store
//!
//! Reads `settings.json` from the config directory (or `--data-dir`),
//! opens the configured backend, and runs one command against it.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

use persistence_cli::{execute, Command};
use wallet_persistence::{BackendKind, PersistenceProvider, SettingsManager};

#[derive(ValueEnum, Debug, Clone, Copy)]
enum BackendArg {
    File,
    Local,
    Memory,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => BackendKind::File,
            BackendArg::Local => BackendKind::Local,
            BackendArg::Memory => BackendKind::Memory,
        }
    }
}

/// Wallet persistence store maintenance
#[derive(Parser, Debug)]
#[command(name = "wallet-store")]
#[command(version)]
#[command(about = "Inspect and maintain a wallet persistence store")]
struct Args {
    /// Directory holding settings.json and the store (defaults to the platform data dir)
    #[arg(long, global = true, env = "WALLET_STORE_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the backend named in settings.json
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    #[command(subcommand)]
    command: Command,
}

fn config_dir(data_dir: Option<&PathBuf>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir.clone()),
        None => ProjectDirs::from("com", "wallet-persistence", "wallet")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .context("could not determine config directory"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config_dir = config_dir(args.data_dir.as_ref())?;
    let settings_manager = SettingsManager::new(&config_dir)?;

    let mut settings = settings_manager.get().clone();
    if let Some(dir) = args.data_dir {
        settings.data_dir = Some(dir);
    }
    if let Some(backend) = args.backend {
        settings.backend = backend.into();
    }
    debug!("Using settings: {:?}", settings);

    let provider = PersistenceProvider::open(&settings)
        .await
        .context("failed to open store")?;

    let output = execute(&provider, args.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
