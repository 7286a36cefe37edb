//! Health, login, logout and whoami

use anyhow::{bail, Context, Result};
use clap::Parser;
use hopeboard_core::HopeConfig;
use std::path::PathBuf;

use super::Ctx;

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Username (the account is created on first login)
    pub username: String,

    /// Password
    #[arg(long, short, env = "HOPEBOARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Print the token instead of saving it to the config file
    #[arg(long)]
    pub print_token: bool,
}

pub async fn run_health(ctx: &Ctx) -> Result<()> {
    let health = ctx
        .client()?
        .health()
        .await
        .with_context(|| format!("Failed to reach {}", ctx.endpoint))?;

    ctx.emit(&health, |health| {
        println!("{} - {}", health.status, health.message);
        if let Some(version) = &health.version {
            println!("version: {}", version);
        }
        let c = health.counts;
        println!(
            "letters: {}  resources: {}  boards: {}  users: {}",
            c.letters, c.resources, c.boards, c.users
        );
    })
}

pub async fn run_login(args: LoginArgs, ctx: Ctx) -> Result<()> {
    let mut client = ctx.client()?;
    let login = client
        .login(&args.username, &args.password)
        .await
        .context("Login failed")?;

    if args.print_token {
        println!("{}", login.token);
        return Ok(());
    }

    let path = store_token(Some(login.token)).context("Failed to save token to config")?;
    tracing::debug!(path = %path.display(), "saved session token");

    ctx.emit(&login.user, |user| {
        println!("Logged in as {} ({})", user.username, user.id);
    })
}

pub async fn run_logout(ctx: Ctx) -> Result<()> {
    if ctx.config.client.token.is_none() {
        println!("Not logged in");
        return Ok(());
    }

    let mut client = ctx.client()?;
    if let Err(e) = client.logout().await {
        // Still forget the local token; the server session expires on its own.
        tracing::warn!(error = %e, "server did not revoke the session");
    }

    store_token(None).context("Failed to update config")?;
    println!("Logged out");
    Ok(())
}

/// Write the token into the config file as it is on disk, so environment
/// overrides applied at load time are not persisted.
fn store_token(token: Option<String>) -> Result<PathBuf> {
    let path = HopeConfig::config_path();
    let mut file_config = HopeConfig::load_from(&path)?;
    file_config.client.token = token;
    file_config.save_to(&path)?;
    Ok(path)
}

pub async fn run_whoami(ctx: &Ctx) -> Result<()> {
    let Some(user) = ctx.client()?.check_auth().await? else {
        bail!("Not logged in. Run: hopeboard login <username>");
    };
    ctx.emit(&user, |user| println!("{} ({})", user.username, user.id))
}
