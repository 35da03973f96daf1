//! librarium CLI - book library REST API server
//!
//! Usage:
//!   librarium serve                 # start the server
//!   librarium --debug serve         # with debug logging
//!   RUST_LOG=librarium=debug ...    # fine-grained log control
//!
//! Connection parameters come from the environment (or a .env file);
//! see librarium-core::config for the variable names.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use librarium_core::AppConfig;
use librarium_server::{db, RateLimiter};

#[derive(Parser, Debug)]
#[command(name = "librarium", version, about = "Book library REST API server")]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set explicitly)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to bind the HTTP server to (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; real environments set variables directly
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Serve(args) => serve(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::from_env().context("loading configuration")?;
    if let Some(port) = args.port {
        config.http.port = port;
    }
    tracing::info!(
        "configuration loaded (db {}:{}, redis {}:{})",
        config.database.host,
        config.database.port,
        config.redis.host,
        config.redis.port
    );

    let pool = db::connect_with_retry(&config.database.url())
        .await
        .context("connecting to database")?;
    db::migrations::run(&pool)
        .await
        .context("running schema setup")?;

    let limiter = RateLimiter::connect(&config.redis.url(), config.rate_limit.clone())
        .await
        .context("connecting to rate-limit counter store")?;

    librarium_server::run_server(pool, limiter, config.http)
        .await
        .context("server error")?;

    Ok(())
}
