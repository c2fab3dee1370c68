//! WebSocket link to the board server.
//!
//! A `Connection` covers exactly one socket lifetime: dial, shovel
//! frames, close. It never reconnects on its own and never queues
//! commands for a later session; the caller decides when a new attempt
//! happens.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use planboard_core::Command;
use planboard_protocol::{decode_update, encode_command};

use super::SessionEvent;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle of the link. Within one socket the state only moves
/// forward: closed, connecting, open, closing, closed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Connecting,
    Open,
    Closing,
}

pub struct Connection {
    state: ConnectionState,
    stream: Option<WsStream>,
    events: UnboundedSender<SessionEvent>,
}

impl Connection {
    pub fn new(events: UnboundedSender<SessionEvent>) -> Self {
        Connection {
            state: ConnectionState::Closed,
            stream: None,
            events,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Dial `url`. Does nothing unless the link is fully closed.
    ///
    /// Returns whether the link ended up open. A failed dial is logged
    /// and reported as `Disconnected`, never raised: the board keeps
    /// running offline.
    pub async fn connect(&mut self, url: &str) -> bool {
        if self.state != ConnectionState::Closed {
            debug!(state = ?self.state, "connect ignored, link not closed");
            return self.is_open();
        }
        self.state = ConnectionState::Connecting;
        // Keep the login token out of the log.
        let display_url = url.split('?').next().unwrap_or(url);
        info!(url = display_url, "connecting");
        match connect_async(url).await {
            Ok((stream, _response)) => {
                self.stream = Some(stream);
                self.state = ConnectionState::Open;
                info!("session open");
                let _ = self.events.send(SessionEvent::Connected);
                true
            }
            Err(e) => {
                warn!(url = display_url, error = %e, "connect failed");
                self.state = ConnectionState::Closed;
                let _ = self.events.send(SessionEvent::Disconnected);
                false
            }
        }
    }

    /// Send one command, if the link is open right now.
    ///
    /// Outside `Open` the command is logged and dropped. A transport
    /// error surfaces through the read side of `run`; here it is only
    /// noted.
    pub async fn send(&mut self, command: &Command) {
        if self.state != ConnectionState::Open {
            debug!(?command, state = ?self.state, "dropping command, link not open");
            return;
        }
        let Some(stream) = self.stream.as_mut() else {
            debug!(?command, "dropping command, no stream");
            return;
        };
        let frame = encode_command(command);
        if let Err(e) = stream.send(Message::Text(frame)).await {
            warn!(error = %e, "send failed");
        }
    }

    /// Start a graceful shutdown. Only an open link can close; in any
    /// other state this is a no-op.
    pub async fn disconnect(&mut self) {
        if self.state != ConnectionState::Open {
            debug!(state = ?self.state, "disconnect ignored, link not open");
            return;
        }
        self.state = ConnectionState::Closing;
        if let Some(stream) = self.stream.as_mut() {
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: "User quit".into(),
            };
            if let Err(e) = stream.close(Some(frame)).await {
                debug!(error = %e, "close frame failed");
            }
        }
    }

    /// Drive one session: commands out, decoded updates in.
    ///
    /// Returns when the socket is gone, clean close or not. The link
    /// is `Closed` afterwards and a `Disconnected` event has been
    /// delivered. Closing the command channel starts a graceful
    /// shutdown.
    pub async fn run(&mut self, commands: &mut UnboundedReceiver<Command>) {
        if self.state != ConnectionState::Open {
            debug!(state = ?self.state, "run called without an open link");
            return;
        }
        let mut commands_open = true;
        loop {
            tokio::select! {
                maybe_command = commands.recv(), if commands_open => {
                    match maybe_command {
                        Some(command) => self.send(&command).await,
                        None => {
                            commands_open = false;
                            self.disconnect().await;
                        }
                    }
                }
                frame = next_frame(&mut self.stream) => {
                    match frame {
                        Some(Ok(Message::Text(text))) => match decode_update(&text) {
                            Ok(update) => {
                                let _ = self.events.send(SessionEvent::Update(update));
                            }
                            Err(e) => warn!(error = %e, "dropping undecodable frame"),
                        },
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "server closed the session");
                            break;
                        }
                        Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                        Some(Ok(other)) => {
                            debug!("ignoring non-text frame: {other:?}");
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "transport error");
                            break;
                        }
                        None => {
                            info!("socket stream ended");
                            break;
                        }
                    }
                }
            }
        }
        self.stream = None;
        self.state = ConnectionState::Closed;
        let _ = self.events.send(SessionEvent::Disconnected);
    }
}

// Pends forever when there is no stream, so the select loop above can
// keep serving the command channel.
async fn next_frame(
    stream: &mut Option<WsStream>,
) -> Option<Result<Message, tokio_tungstenite::tungstenite::Error>> {
    match stream {
        Some(ws) => ws.next().await,
        None => std::future::pending().await,
    }
}
