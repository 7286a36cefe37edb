//! HTTP server command for the hopeboard API
//!
//! Settings come from ~/.hopeboard/config.toml and the environment; flags
//! given here win over both.

use anyhow::{Context, Result};
use clap::Parser;

use hopeboard_core::{HopeConfig, StorageKind};
use hopeboard_server::{open_store, run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:5001)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Storage backend: memory or postgres
    #[arg(long, value_parser = parse_storage)]
    pub storage: Option<StorageKind>,

    /// Database URL (implies --storage postgres)
    #[arg(long)]
    pub database_url: Option<String>,
}

fn parse_storage(s: &str) -> Result<StorageKind, String> {
    s.parse().map_err(|e: hopeboard_core::HopeError| e.to_string())
}

impl ServeArgs {
    /// Layer the flags over the loaded config
    fn merge_into(self, config: &HopeConfig) -> HopeConfig {
        let mut merged = config.clone();
        if let Some(bind) = self.bind {
            merged.server.bind = bind;
        }
        if self.cors_permissive {
            merged.server.cors_permissive = true;
        }
        if let Some(url) = self.database_url {
            merged.server.database_url = Some(url);
            merged.server.storage = StorageKind::Postgres;
        }
        if let Some(storage) = self.storage {
            merged.server.storage = storage;
        }
        merged
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &HopeConfig) -> Result<()> {
    let config = args.merge_into(config);
    let server_config = ServerConfig::from_config(&config).context("Invalid server settings")?;

    tracing::info!(
        bind = %server_config.bind_addr,
        storage = %config.server.storage,
        "Starting hopeboard server"
    );

    let store = open_store(&config)
        .await
        .context("Failed to open storage")?;

    // Run server (blocks until shutdown)
    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(bind: Option<&str>, storage: Option<StorageKind>, url: Option<&str>) -> ServeArgs {
        ServeArgs {
            bind: bind.map(String::from),
            cors_permissive: false,
            storage,
            database_url: url.map(String::from),
        }
    }

    #[test]
    fn flags_override_config() {
        let config = HopeConfig::default();
        let merged = args(Some("0.0.0.0:8080"), None, None).merge_into(&config);
        assert_eq!(merged.server.bind, "0.0.0.0:8080");
        assert_eq!(merged.server.storage, StorageKind::Memory);
    }

    #[test]
    fn database_url_selects_postgres() {
        let merged = args(None, None, Some("postgres://localhost/hope"))
            .merge_into(&HopeConfig::default());
        assert_eq!(merged.server.storage, StorageKind::Postgres);

        // An explicit --storage still wins
        let merged = args(None, Some(StorageKind::Memory), Some("postgres://localhost/hope"))
            .merge_into(&HopeConfig::default());
        assert_eq!(merged.server.storage, StorageKind::Memory);
    }
}
