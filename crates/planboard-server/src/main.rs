//! Binary WebSocket server for the planning board.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use planboard_server::config::Config;
use planboard_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        "starting planboard-server"
    );

    server::run(config).await
}
