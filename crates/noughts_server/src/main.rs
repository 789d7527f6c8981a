//! Noughts - game server CLI

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use noughts_server::{Cli, Command, ServeOverrides, ServerConfig, run_migrations, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            storage,
            database_path,
        } => {
            let base = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            let config = ServeOverrides {
                host,
                port,
                storage,
                database_path,
            }
            .apply(base);

            init_tracing(config.log_filter());
            info!(?config, "Starting noughts server");
            serve(config).await
        }
        Command::Migrate { database_path } => {
            init_tracing(ServerConfig::default().log_filter());
            let applied = run_migrations(&database_path)?;
            info!(applied, path = %database_path, "Database migrated");
            Ok(())
        }
    }
}

fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}
