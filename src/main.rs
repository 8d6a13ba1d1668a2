//! Console proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Dashboard (browser)
//!          │  /api/...
//!          ▼
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │  request ID ─▶ token check ─▶ schema check ─▶ forward ──────┼──▶ Backend API
//!   │                  (401)          (422)        (500 on        │
//!   │                                               network)      │
//!   │  response ◀─ translate (2xx / 400 / 403 kept, rest → 500) ◀─┼──
//!   └──────────────────────────────────────────────────────────────┘
//!        admin listener (/admin/*)       Prometheus listener
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use console_proxy::admin::setup_admin_router;
use console_proxy::config::load_config;
use console_proxy::lifecycle::{wait_for_signal, Shutdown};
use console_proxy::observability::{init_logging, init_metrics};
use console_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "console-proxy", version, about = "Authenticated backend proxy for the tax console")]
struct Args {
    /// Path to a TOML config file. Defaults and environment apply without one.
    #[arg(short, long, env = "CONSOLE_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "console-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        auth_scheme = config.upstream.auth_scheme.as_str(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let admin = config.admin.clone();
    let server = HttpServer::new(config)?;

    if admin.enabled {
        let admin_listener = TcpListener::bind(&admin.bind_address).await?;
        let admin_router = setup_admin_router(server.state().clone());
        let mut admin_shutdown = shutdown.subscribe();
        tracing::info!(address = %admin.bind_address, "Admin API listening");

        tokio::spawn(async move {
            let result = axum::serve(admin_listener, admin_router)
                .with_graceful_shutdown(async move {
                    let _ = admin_shutdown.recv().await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Admin API stopped with error");
            }
        });
    }

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
