//! userdb-lookup - resolve users and groups via systemd-userdbd
//!
//! Queries the NameServiceSwitch varlink socket directly, without going
//! through the C library. Prints a passwd(5)/group(5)-style line, or JSON.
//!
//! Exit status: 0 found, 2 not found, 1 error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use userdb_api::{Group, Selector, User};
use userdb_config::{ResolverConfig, default_config_path, load_config};
use userdb_core::Resolver;

/// userdb-lookup - Resolve users and groups via systemd-userdbd
#[derive(Parser, Debug)]
#[command(name = "userdb-lookup")]
#[command(about = "Resolve users and groups via systemd-userdbd", long_about = None)]
struct Args {
    /// Socket path override (or set USERDB_SOCKET env var)
    #[arg(short, long, env = "USERDB_SOCKET")]
    socket: Option<PathBuf>,

    /// Configuration file path (default: ~/.config/userdb/config.toml, used if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Lookup,
}

#[derive(Subcommand, Debug)]
enum Lookup {
    /// Look up a user by name or uid
    User {
        /// Username, or numeric uid
        key: String,
    },
    /// Look up a group by name or gid
    Group {
        /// Group name, or numeric gid
        key: String,
    },
}

enum Found {
    User(User),
    Group(Group),
}

fn resolver_config(args: &Args) -> Result<ResolverConfig> {
    if let Some(socket) = &args.socket {
        return Ok(ResolverConfig::new(socket));
    }

    match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let path = default_config_path();
            if path.exists() {
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))
            } else {
                Ok(ResolverConfig::default())
            }
        }
    }
}

async fn lookup(resolver: &Resolver, command: &Lookup) -> Result<Option<Found>> {
    let found = match command {
        Lookup::User { key } => {
            let selector = Selector::parse(key);
            resolver
                .user(&selector)
                .await
                .with_context(|| format!("User lookup ({}) failed", selector))?
                .map(Found::User)
        }
        Lookup::Group { key } => {
            let selector = Selector::parse(key);
            resolver
                .group(&selector)
                .await
                .with_context(|| format!("Group lookup ({}) failed", selector))?
                .map(Found::Group)
        }
    };
    Ok(found)
}

fn render(found: &Found, json: bool) -> Result<String> {
    let line = match (found, json) {
        (Found::User(user), true) => serde_json::to_string_pretty(user)?,
        (Found::Group(group), true) => serde_json::to_string_pretty(group)?,
        (Found::User(user), false) => format!(
            "{}:{}:{}:{}:{}",
            user.username, user.uid, user.gid, user.name, user.home_dir
        ),
        (Found::Group(group), false) => format!("{}:{}", group.name, group.gid),
    };
    Ok(line)
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = resolver_config(&args)?;
    info!(socket = %config.socket_path.display(), "Using identity service");

    let cancel = CancellationToken::new();
    if let Some(secs) = args.timeout {
        let deadline = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("Invalid timeout {}", secs))?;
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            debug!(?deadline, "Lookup deadline reached");
            token.cancel();
        });
    }

    let resolver = Resolver::new(config).with_cancellation(cancel);
    match lookup(&resolver, &args.command).await? {
        Some(found) => {
            println!("{}", render(&found, args.json)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Not found");
            Ok(ExitCode::from(2))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
