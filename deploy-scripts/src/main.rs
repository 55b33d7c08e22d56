use std::io;

use clap::Parser;
use deploy_scripts::{
    artifacts::ArtifactStore,
    cli::{Cli, Command},
    config::ProjectConfig,
};
use eyre::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load `.env` before parsing, so it can supply flag defaults
    let dotenv = dotenvy::dotenv();

    let Cli {
        network,
        artifacts,
        confirmations,
        log_level,
        log_format,
        command,
    } = Cli::parse();

    init_logging(log_level, &log_format);
    if let Ok(path) = &dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let config = ProjectConfig::from_env();

    if let Command::Deploy(_) = command {
        tracing::debug!(
            solc = config.solidity.version,
            optimizer_runs = config.solidity.optimizer.runs,
            "using compiler settings"
        );
    }

    let artifacts = ArtifactStore::new(artifacts);
    command
        .run(&config, &network, &artifacts, confirmations, &mut io::stdout())
        .await?;

    Ok(())
}

/// Log to stderr, so that stdout only carries the scripts' results
fn init_logging(level: Level, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}
