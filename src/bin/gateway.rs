//! Gateway binary.
//!
//! Loads configuration, starts the HTTP server and serves until Ctrl-C.
//! Diagnostics go to stderr; set `RUST_LOG` to change verbosity.

use anyhow::Context;
use knowledge_gateway::{GatewayConfig, GatewayServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::load().context("failed to load gateway configuration")?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "knowledge-gateway starting"
    );

    let server = GatewayServer::start(&config).await.map_err(|e| {
        tracing::error!(error = %e, "knowledge-gateway failed to start");
        anyhow::anyhow!("knowledge-gateway failed: {e}")
    })?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!(addr = %server.addr(), "shutting down");
    server.shutdown();
    Ok(())
}
