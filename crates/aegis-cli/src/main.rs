use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aegis_core::config::ConsoleConfig;

mod repl;

#[derive(Parser)]
#[command(name = "aegis")]
#[command(about = "Aegis Console - conversational infrastructure health console", long_about = None)]
struct Cli {
    /// Base URL of the Aegis backend
    #[arg(long)]
    backend_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    let config = load_config(&cli)?;
    repl::run(config).await
}

/// Resolves the console configuration: file, then environment, then flags.
fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            ConsoleConfig::from_toml_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => ConsoleConfig::default(),
    };

    if let Ok(url) = std::env::var("AEGIS_BACKEND_URL") {
        config.backend_url = url;
    }
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }

    Ok(config)
}
