//! Unicorn API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  UNICORN PROXY                   │
//!   Mobile app        │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ──────────────────┼─▶│  http   │──▶│ routing  │──▶│   upstream   │───┼──▶ Backend API
//!                     │  │ server  │   │  table   │   │    client    │   │
//!                     │  └─────────┘   └────┬─────┘   └──────────────┘   │
//!                     │                     │ requires_secret            │
//!                     │                     ▼                            │
//!                     │              ┌─────────────┐                     │
//!                     │              │ fingerprint │◀── descriptions,    │
//!                     │              │  provider   │    engine source,   │
//!                     │              └─────────────┘    version consts   │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use unicorn_proxy::config::load_or_default;
use unicorn_proxy::lifecycle::{bootstrap, signals, Shutdown};
use unicorn_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "unicorn-proxy")]
#[command(about = "Authenticating API proxy for the unicorn mobile apps", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        code_dir = %config.artifacts.code_dir,
        "unicorn-proxy starting"
    );

    let (server, listener) = bootstrap(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
