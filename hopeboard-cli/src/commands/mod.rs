//! Command implementations for the hopeboard CLI

pub mod account;
pub mod boards;
pub mod letters;
pub mod resources;
pub mod serve;

use anyhow::{Context, Result};
use hopeboard_client::ApiClient;
use hopeboard_core::HopeConfig;
use serde::Serialize;

// Re-export dispatcher functions for flat access from main.rs
pub use account::{run_health, run_login, run_logout, run_whoami};
pub use boards::run_boards;
pub use letters::run_letters;
pub use resources::run_resources;
pub use serve::run_serve;

/// Shared state for client-side commands
pub struct Ctx {
    pub config: HopeConfig,
    pub endpoint: String,
    pub json: bool,
}

impl Ctx {
    pub fn new(config: HopeConfig, endpoint: Option<String>, json: bool) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| config.client.endpoint.clone());
        Self {
            config,
            endpoint,
            json,
        }
    }

    /// API client carrying the saved token, if any
    pub fn client(&self) -> Result<ApiClient> {
        let client = ApiClient::new(&self.endpoint)
            .context("Failed to build HTTP client")?
            .with_token(self.config.client.token.clone());
        Ok(client)
    }

    /// Print `value` as pretty JSON when `--json` is set; otherwise run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}
