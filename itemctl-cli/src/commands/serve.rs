//! HTTP server command for the itemctl API
//!
//! Opens the SQLite database, creates the schema if needed, and serves
//! until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use itemctl_server::db::{create_pool_with_options, migrations, pool::DEFAULT_MAX_CONNECTIONS};
use itemctl_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ITEMCTL_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// SQLite database file (created if missing)
    #[arg(long, env = "ITEMCTL_DB_PATH", default_value = "/data/items.db")]
    pub db_path: PathBuf,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!(db_path = %args.db_path.display(), "Opening item database");

    let pool = create_pool_with_options(&args.db_path, args.max_connections)
        .await
        .with_context(|| format!("Failed to open database at {}", args.db_path.display()))?;

    migrations::run(&pool)
        .await
        .context("Failed to create item schema")?;

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    tracing::info!("Starting itemctl server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
