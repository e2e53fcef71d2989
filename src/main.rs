//! Scoring adapter server (default binary).
//!
//! Serves the line-delimited JSON scoring protocol over TCP.
//! Configured through `FARKLE_*` environment variables; log level via `RUST_LOG`.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use farkle::adapter::{check_tcp_listen_available, run_server, ServerConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if ServerConfig::is_disabled() {
        info!("scoring adapter disabled (FARKLE_DISABLED)");
        return Ok(());
    }

    let config = ServerConfig::from_env();
    check_tcp_listen_available(&config.host, config.port)
        .with_context(|| format!("cannot listen on {}:{}", config.host, config.port))?;

    let rt = Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(async {
        tokio::select! {
            result = run_server(config, None) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                Ok(())
            }
        }
    })
}
