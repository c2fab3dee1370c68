//! Shared types for the board server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - channel aliases between client tasks and the board loop
//! - `BoardRequest`: events flowing from clients to the board loop

use std::collections::HashMap;
use std::sync::Arc;

use planboard_core::{Command, Update};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness over the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Frames queued to one client's writer task.
#[derive(Debug)]
pub enum Outbound {
    /// An update to encode and push.
    Update(Update),

    /// Close the socket with this reason and stop the writer.
    Close { reason: String },
}

pub type OutboundTx = mpsc::UnboundedSender<Outbound>;
pub type OutboundRx = mpsc::UnboundedReceiver<Outbound>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ClientId`
/// - Value: `OutboundTx` feeding that client's writer task.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// What a client task reports to the board loop.
#[derive(Debug)]
pub enum ClientEvent {
    /// Handshake done and the client registered.
    Joined { user: String },

    /// Connection gone, whatever the reason.
    Left,

    /// One decoded command frame.
    Command(Command),
}

/// Event flowing from a client task into the central board loop.
#[derive(Debug)]
pub struct BoardRequest {
    pub client_id: ClientId,
    pub event: ClientEvent,
}

/// Channel from clients → board loop.
pub type BoardTx = mpsc::UnboundedSender<BoardRequest>;
pub type BoardRx = mpsc::UnboundedReceiver<BoardRequest>;
