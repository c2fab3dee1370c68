//! WebSocket listener and top-level server wiring.
//!
//! This module:
//! - Binds the configured address/port.
//! - Enforces the client limit at accept time.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task for the handshake and I/O,
//!   - a single central board task that owns the `BoardModel`.
//!
//! The per-client logic and the board loop live in the `client` and
//! `board_task` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::board_task;
use crate::client;
use crate::config::Config;
use crate::model::BoardModel;
use crate::types::{BoardRx, BoardTx, ClientId, ClientRegistry};

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// A bound listener that is not serving yet.
///
/// Binding and serving are split so a caller (or a test) can bind port
/// 0 and read the real address back before the accept loop starts.
pub struct BoundServer {
    listener: TcpListener,
    config: Config,
    model: BoardModel,
}

/// Bind the listener and load the model.
pub async fn bind(config: Config) -> Result<BoundServer> {
    let model = match &config.model_path {
        Some(path) => BoardModel::from_file(path)?,
        None => BoardModel::demo(),
    };
    let listener = TcpListener::bind(config.socket_addr_string()).await?;
    Ok(BoundServer {
        listener,
        config,
        model,
    })
}

/// Bind and serve until the process exits.
pub async fn run(config: Config) -> Result<()> {
    bind(config).await?.run().await
}

impl BoundServer {
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<()> {
        let BoundServer {
            listener,
            config,
            model,
        } = self;

        info!(
            addr = %listener.local_addr()?,
            max_clients = config.max_clients,
            "board server listening"
        );

        // Shared registry of clients → outbound channels.
        let clients: ClientRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

        // Channel from clients → board task.
        let (board_tx, board_rx): (BoardTx, BoardRx) = mpsc::unbounded_channel();

        // Spawn the central board task.
        {
            let clients = clients.clone();
            tokio::spawn(async move {
                board_task::run_board_loop(model, board_rx, clients).await;
            });
        }

        loop {
            let (stream, peer_addr) = listener.accept().await?;

            let connected = {
                let guard = clients.read().await;
                guard.len()
            };
            if connected >= config.max_clients {
                warn!(
                    %peer_addr,
                    max_clients = config.max_clients,
                    "rejecting connection, client limit reached"
                );
                // Dropping the stream closes it before any handshake.
                continue;
            }

            let client_id = next_client_id();
            let clients = clients.clone();
            let board_tx = board_tx.clone();
            let secret = config.secret_key.clone();
            let max_clients = config.max_clients;

            tokio::spawn(async move {
                let outcome =
                    client::run_client(client_id, stream, secret, max_clients, board_tx, clients)
                        .await;
                match outcome {
                    Ok(()) => info!(client = client_id.0, "client connection closed"),
                    Err(e) => warn!(client = client_id.0, error = %e, "client connection failed"),
                }
            });
        }
    }
}
