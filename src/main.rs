use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use clinicdesk::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli},
    utils::init_logger,
    HttpGateway, PreferenceStore, SessionContext,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = load(&cli)?;
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    if !config.ui.color {
        colored::control::set_override(false);
    }

    let prefs_path = config.storage.resolve_preferences_path()?;
    let store = Arc::new(
        PreferenceStore::open(&prefs_path)
            .with_context(|| format!("Failed to open {}", prefs_path.display()))?,
    );
    let gateway = Arc::new(HttpGateway::new(&config.backend, store.clone())?);
    let ctx = SessionContext::new(store, gateway);

    handle_command(cli.command, ctx).await
}

fn load(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => load_config_from(path),
        None => match load_config() {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️  Failed to load config: {:#}. Using defaults.", e);
                Ok(Config::default())
            }
        },
    }
}
