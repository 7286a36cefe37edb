//! hopeboard CLI - run the API server and use it from the terminal
//!
//! - `serve`: run the HTTP API (in-memory or Postgres storage)
//! - `login` / `logout` / `whoami`: manage the saved session token
//! - `boards`, `letters`, `resources`: browse and create content
//! - `config`: manage ~/.hopeboard/config.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopeboard_core::HopeConfig;

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "hopeboard",
    author,
    version,
    about = "Moodboards, letters of encouragement and self-care resources",
    long_about = "Run the hopeboard API server, or talk to one: log in, list and create \
                  boards, read and write letters, browse resources."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// API endpoint (overrides client.endpoint in the config)
    #[arg(long, env = "HOPEBOARD_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Print JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Check that the server is up and show record counts
    Health,
    /// Log in (creates the account on first use) and save the token
    Login(commands::account::LoginArgs),
    /// Revoke the saved session and forget the token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Board operations (list, show, create, publish)
    Boards(commands::boards::BoardsArgs),
    /// Letter operations (list, write, like)
    Letters(commands::letters::LettersArgs),
    /// Resource operations (list, add)
    Resources(commands::resources::ResourcesArgs),
    /// Manage hopeboard configuration (init, get, set, list, path)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let tracing_config = TracingConfig { debug: cli.debug };
    match cli.command {
        Commands::Serve(_) => tracing_setup::init_server_tracing(&tracing_config).ok(),
        _ => tracing_setup::init_tracing(&tracing_config).ok(),
    };

    // Config commands work even when the file does not parse.
    let command = match cli.command {
        Commands::Config(args) => return config::run_config(args),
        other => other,
    };

    let config = HopeConfig::load().context("Failed to load hopeboard config")?;
    let ctx = commands::Ctx::new(config, cli.endpoint, cli.json);

    match command {
        Commands::Serve(args) => commands::run_serve(args, &ctx.config).await?,
        Commands::Health => commands::run_health(&ctx).await?,
        Commands::Login(args) => commands::run_login(args, ctx).await?,
        Commands::Logout => commands::run_logout(ctx).await?,
        Commands::Whoami => commands::run_whoami(&ctx).await?,
        Commands::Boards(args) => commands::run_boards(args, &ctx).await?,
        Commands::Letters(args) => commands::run_letters(args, &ctx).await?,
        Commands::Resources(args) => commands::run_resources(args, &ctx).await?,
        Commands::Config(args) => config::run_config(args)?,
    }
    Ok(())
}
