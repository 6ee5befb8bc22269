mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_ask, handle_chat, handle_index, handle_status, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credentials may live in ./.env; a missing file is fine.
    let _ = dotenvy::dotenv();

    let level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Index(args) => handle_index(args, config_path).await?,
        Commands::Ask(args) => handle_ask(args, config_path).await?,
        Commands::Chat { dir } => handle_chat(dir, config_path).await?,
        Commands::Status => handle_status(config_path).await?,
    }

    Ok(())
}
