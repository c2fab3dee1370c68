// crates/planboard-server/src/client.rs

use anyhow::{Context, Result};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use planboard_protocol::auth::{self, Login};
use planboard_protocol::{encode_update, parse_command};

use crate::types::{
    BoardRequest, BoardTx, ClientEvent, ClientId, ClientRegistry, Outbound, OutboundRx, OutboundTx,
};

/// Run the I/O for a single connection: authenticate the handshake,
/// register with the board loop, then shovel frames both ways until
/// the socket dies or the session expires.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    secret: String,
    max_clients: usize,
    board_tx: BoardTx,
    clients: ClientRegistry,
) -> Result<()> {
    let peer_addr = stream.peer_addr().ok();

    // The login comes out of the handshake callback; a refused
    // handshake turns into an HTTP 401 on the upgrade request.
    let mut login: Option<Login> = None;
    let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let query = request.uri().query().unwrap_or("");
        match auth::verify_query(query, &secret, Utc::now().timestamp()) {
            Ok(l) => {
                login = Some(l);
                Ok(response)
            }
            Err(e) => {
                let mut refusal = ErrorResponse::new(Some(e.to_string()));
                *refusal.status_mut() = StatusCode::UNAUTHORIZED;
                Err(refusal)
            }
        }
    };

    let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
        .await
        .context("handshake refused")?;
    let login = login.context("handshake succeeded without a login")?;

    debug!(
        client = client_id.0,
        user = %login.user,
        peer = ?peer_addr,
        "authenticated"
    );

    // Register under the limit. A burst of parallel handshakes can race
    // past the accept-time check, so re-check under the write lock.
    let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
    {
        let mut guard = clients.write().await;
        if guard.len() >= max_clients {
            warn!(client = client_id.0, "client limit reached, closing");
            let _ = ws
                .close(Some(CloseFrame {
                    code: CloseCode::Again,
                    reason: "server full".into(),
                }))
                .await;
            return Ok(());
        }
        guard.insert(client_id, out_tx.clone());
    }

    let _ = board_tx.send(BoardRequest {
        client_id,
        event: ClientEvent::Joined {
            user: login.user.clone(),
        },
    });

    let (mut ws_tx, mut ws_rx) = ws.split();

    // Writer task: encode updates and push them out.
    let _writer = tokio::spawn(async move {
        let mut out_rx = out_rx;
        while let Some(out) = out_rx.recv().await {
            match out {
                Outbound::Update(update) => match encode_update(&update) {
                    Ok(frame) => {
                        if ws_tx.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(client = client_id.0, error = %e, "dropping unencodable update");
                    }
                },
                Outbound::Close { reason } => {
                    let _ = ws_tx
                        .send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Policy,
                            reason: reason.into(),
                        })))
                        .await;
                    break;
                }
            }
        }
    });

    // Reader loop: decode command frames and hand them to the board.
    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!(client = client_id.0, error = %e, "read error");
                break;
            }
        };
        match frame {
            Message::Text(text) => {
                // Sessions have a hard expiry; re-check on every frame.
                if login.expired(Utc::now().timestamp()) {
                    warn!(client = client_id.0, user = %login.user, "session expired");
                    let _ = out_tx.send(Outbound::Close {
                        reason: "session expired".to_string(),
                    });
                    break;
                }
                match parse_command(&text) {
                    Ok(command) => {
                        let sent = board_tx.send(BoardRequest {
                            client_id,
                            event: ClientEvent::Command(command),
                        });
                        if sent.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(client = client_id.0, frame = %text, error = %e, "ignoring bad command");
                    }
                }
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
            other => {
                debug!(client = client_id.0, "ignoring non-text frame: {other:?}");
            }
        }
    }

    // Remove client from registry.
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }
    let _ = board_tx.send(BoardRequest {
        client_id,
        event: ClientEvent::Left,
    });

    Ok(())
}
