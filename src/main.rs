use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod daemon;
mod errors;
mod grid;
mod opensky;
mod radar;
mod types;

#[cfg(test)]
mod testing;

use crate::config::{Config, CLIENT_ID_VAR, CLIENT_SECRET_VAR};
use crate::daemon::RelayDaemon;

/// Relays live OpenSky aircraft positions over Finland as compact radar records
#[derive(Parser, Debug)]
#[command(name = "airguardian-radar", version)]
struct Args {
    /// Configuration file (TOML). Defaults to ~/.airguardian/config.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.bind_addr
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("airguardian_radar=debug,info")),
        )
        .init();

    let args = Args::parse();

    info!("🚀 AirGuardian radar relay v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    if let Err(e) = config.credentials() {
        error!("❌ {}", e);
        error!("🚫 Cannot start without OpenSky API credentials ({} / {}).", CLIENT_ID_VAR, CLIENT_SECRET_VAR);
        std::process::exit(1);
    }

    let daemon = RelayDaemon::new(config)?;
    info!("✓ Token cache and OpenSky client ready");
    daemon.run().await?;

    Ok(())
}
