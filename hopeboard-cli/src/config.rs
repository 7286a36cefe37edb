use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use hopeboard_core::HopeConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the default settings
    Init(InitArgs),
    /// Get a config value by dot-notation key
    Get(GetArgs),
    /// Set a config value by dot-notation key
    Set(SetArgs),
    /// List all config values (file plus environment overrides)
    List,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dot-notation key (e.g., "server.bind")
    pub key: String,
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// One of server.bind, server.cors_permissive, server.storage,
    /// server.database_url, client.endpoint, client.token
    pub key: String,

    /// New value (empty clears optional keys)
    pub value: String,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Get(args) => run_get(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = HopeConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    HopeConfig::default()
        .save_to(&config_path)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Point the client at a server: hopeboard config set client.endpoint <url>");
    println!("  2. Or run one locally: hopeboard serve");
    Ok(())
}

fn run_get(args: GetArgs) -> Result<()> {
    let config = HopeConfig::load()?;
    let value = config
        .get(&args.key)
        .ok_or_else(|| anyhow!("Unknown or unset config key: {}", args.key))?;
    println!("{}", value);
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    // Edit the file as written; environment overrides stay out of it.
    let path = HopeConfig::config_path();
    let mut config = HopeConfig::load_from(&path)?;
    config.set(&args.key, &args.value)?;
    config
        .save_to(&path)
        .context(format!("Failed to write config file: {:?}", path))?;
    tracing::debug!(key = %args.key, path = %path.display(), "config updated");
    Ok(())
}

fn run_list() -> Result<()> {
    let config = HopeConfig::load()?;

    // Pretty-print config as TOML
    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;

    println!("{}", toml_str);
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", HopeConfig::config_path().display());
    Ok(())
}
