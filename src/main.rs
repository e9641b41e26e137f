//! Development proxy.
//!
//! A front server for local development built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                  DEV PROXY                   │
//!     Client Request       │  ┌─────────┐    ┌──────────┐                 │
//!     ─────────────────────┼─▶│  http   │───▶│ routing  │── match ───────┼──▶ Backend
//!                          │  │ server  │    │  rules   │                 │    (127.0.0.1:8000)
//!                          │  └─────────┘    └────┬─────┘                 │
//!                          │                      │ no match              │
//!                          │                      ▼                       │
//!     Client Response      │               ┌──────────────┐               │
//!     ◀────────────────────┼───────────────│ src_dir files│               │
//!                          │               └──────────────┘               │
//!                          │                                              │
//!                          │  config · lifecycle · observability          │
//!                          └──────────────────────────────────────────────┘
//! ```
//!
//! Rules come from the profile of the selected mode. The development profile
//! forwards `/api/**`, `/docs`, `/redoc` and `/openapi.json`; the production
//! profile has none.

use clap::Parser;
use std::path::PathBuf;

use dev_proxy::config::{resolve_config, Mode, Overrides};
use dev_proxy::lifecycle::startup;
use dev_proxy::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "dev-proxy", version)]
#[command(about = "Forwards API and docs routes to a local backend during development", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "DEV_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Runtime mode selecting the active rule profile.
    #[arg(short, long, env = "DEV_PROXY_MODE", default_value_t = Mode::Development)]
    mode: Mode,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the directory served for non-proxied requests.
    #[arg(long)]
    src_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = Overrides {
        bind_address: cli.bind,
        src_dir: cli.src_dir,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %cli.mode,
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        "dev-proxy starting"
    );

    startup::run(config, cli.mode).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
