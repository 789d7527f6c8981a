//! Command-line interface for the noughts server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ServerConfig, StorageKind};

/// Noughts - transactional noughts-and-crosses game server
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Noughts-and-crosses game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML config file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Storage backend
        #[arg(long, value_enum)]
        storage: Option<StorageKind>,

        /// SQLite database file
        #[arg(long)]
        database_path: Option<String>,
    },

    /// Apply pending migrations to a SQLite database
    Migrate {
        /// SQLite database file
        #[arg(long, default_value = "noughts.db")]
        database_path: String,
    },
}

/// Flag overrides for [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServeOverrides {
    /// Host to bind to.
    pub host: Option<String>,
    /// Port to bind to.
    pub port: Option<u16>,
    /// Storage backend.
    pub storage: Option<StorageKind>,
    /// SQLite database file.
    pub database_path: Option<String>,
}

impl ServeOverrides {
    /// Applies every flag that was given on top of `config`.
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(storage) = self.storage {
            config = config.with_storage(storage);
        }
        if let Some(path) = self.database_path {
            config = config.with_database_path(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from([
            "noughts",
            "serve",
            "--port",
            "9001",
            "--storage",
            "sqlite",
            "--database-path",
            "games.db",
        ]);
        match cli.command {
            Command::Serve {
                port,
                storage,
                database_path,
                config,
                host,
            } => {
                assert_eq!(port, Some(9001));
                assert_eq!(storage, Some(StorageKind::Sqlite));
                assert_eq!(database_path.as_deref(), Some("games.db"));
                assert!(config.is_none());
                assert!(host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_only_replace_given_flags() {
        let overrides = ServeOverrides {
            port: Some(4000),
            ..ServeOverrides::default()
        };
        let config = overrides.apply(ServerConfig::default());
        assert_eq!(config.port(), &4000);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.storage(), &StorageKind::Memory);
    }
}
