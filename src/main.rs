//! # Casting API Main Entry Point
//!
//! `casting serve` (the default) runs the HTTP API; `casting migrate`
//! applies pending database migrations and exits.

use anyhow::Context;
use casting::{config::ConfigLoader, db, server::run_server, telemetry};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "casting", version, about = "Casting marketplace studio API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing telemetry")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }
    if config.uses_ephemeral_session_secret() {
        tracing::warn!(
            profile = %config.profile,
            "CASTING_SESSION_SECRET not set; sessions are verified with a random per-process secret"
        );
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => db::run_migrations(&db).await,
        Command::Serve => {
            if config.auto_migrate {
                db::run_migrations(&db).await?;
            }
            run_server(config, db).await
        }
    }
}
