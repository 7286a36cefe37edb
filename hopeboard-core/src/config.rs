//! `~/.hopeboard/config.toml`, shared by the server and the CLI client
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:5001"
//! cors_permissive = false
//! storage = "postgres"
//! database_url = "${DATABASE_URL}"
//!
//! [client]
//! endpoint = "http://localhost:5001"
//! token = "..."
//! ```
//!
//! A missing file means defaults. Environment variables override the file.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HopeError, Result};

pub const DEFAULT_BIND: &str = "127.0.0.1:5001";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopeConfig {
    pub server: ServerSection,
    pub client: ClientSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    /// Allow any origin instead of localhost only
    pub cors_permissive: bool,
    pub storage: StorageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_permissive: false,
            storage: StorageKind::Memory,
            database_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
        }
    }
}

/// Storage backend for the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Postgres,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        })
    }
}

impl FromStr for StorageKind {
    type Err = HopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(HopeError::config(format!(
                "unknown storage '{}' (expected memory or postgres)",
                other
            ))),
        }
    }
}

impl HopeConfig {
    /// Load `~/.hopeboard/config.toml` and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load a config file without environment overrides. A missing file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| HopeError::invalid_config(path, e.to_string()))?;
        config.expand_variables();
        Ok(config)
    }

    /// Config file path: `$HOPEBOARD_CONFIG`, else ~/.hopeboard/config.toml
    pub fn config_path() -> PathBuf {
        if let Some(path) = env::var_os("HOPEBOARD_CONFIG").filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hopeboard/config.toml")
    }

    /// Apply `HOPEBOARD_*` and `DATABASE_URL` overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        let vars: HashMap<String, String> = env::vars().collect();
        self.apply_overrides(&vars)
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(bind) = vars.get("HOPEBOARD_BIND") {
            self.server.bind = bind.clone();
        }
        if let Some(storage) = vars.get("HOPEBOARD_STORAGE") {
            self.server.storage = storage.parse()?;
        }
        if let Some(url) = vars.get("DATABASE_URL") {
            self.server.database_url = Some(url.clone());
        }
        if let Some(endpoint) = vars.get("HOPEBOARD_ENDPOINT") {
            self.client.endpoint = endpoint.clone();
        }
        if let Some(token) = vars.get("HOPEBOARD_TOKEN") {
            self.client.token = Some(token.clone());
        }
        Ok(())
    }

    /// Expand ${VAR} references in the database url
    fn expand_variables(&mut self) {
        if let Some(url) = &self.server.database_url {
            let vars: HashMap<String, String> = env::vars().collect();
            let expanded = expand_string(url, &vars);
            self.server.database_url = (!expanded.is_empty()).then_some(expanded);
        }
    }

    /// Save to ~/.hopeboard/config.toml
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| HopeError::config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Look up a value by dot-notation key, e.g. `server.bind`.
    pub fn get(&self, key: &str) -> Option<String> {
        let root = toml::Value::try_from(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&root, |value, part| value.get(part))?;
        Some(match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a value by dot-notation key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.bind" => self.server.bind = value.to_string(),
            "server.cors_permissive" => {
                self.server.cors_permissive = value
                    .parse()
                    .map_err(|_| HopeError::config(format!("'{}' is not true or false", value)))?
            }
            "server.storage" => self.server.storage = value.parse()?,
            "server.database_url" => self.server.database_url = non_empty(value),
            "client.endpoint" => self.client.endpoint = value.to_string(),
            "client.token" => self.client.token = non_empty(value),
            other => return Err(HopeError::config(format!("unknown key '{}'", other))),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
    let mut result = s.to_string();
    for (key, value) in vars {
        let pattern = format!("${{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}
