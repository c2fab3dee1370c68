//! Central board loop.
//!
//! This task owns the `BoardModel`, the chat history and every
//! client's subscription set, and processes all `BoardRequest`s in
//! arrival order.
//!
//! Routing policy:
//! - catalog and plan replies: unicast to the requesting client.
//! - solve results: per-client, filtered to that client's
//!   subscriptions; changed demands ride along even for clients not
//!   subscribed to them.
//! - chat: broadcast to everyone, with history replayed to joiners.

use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::{debug, info};

use planboard_core::{ChatMessage, Command, EntityKey, PlanUpdate, Update};

use crate::model::{BoardModel, SolveOutcome};
use crate::types::{BoardRequest, BoardRx, ClientEvent, ClientId, ClientRegistry, Outbound};

/// Upper bound on chat lines kept for replay.
const CHAT_HISTORY_LIMIT: usize = 200;

struct ClientState {
    user: String,
    subscriptions: IndexSet<EntityKey>,
}

/// Run the central board processing loop.
///
/// - `board_rx`: receives events from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_board_loop(mut model: BoardModel, mut board_rx: BoardRx, clients: ClientRegistry) {
    let mut sessions: HashMap<ClientId, ClientState> = HashMap::new();
    let mut chat_history: Vec<ChatMessage> = Vec::new();

    while let Some(req) = board_rx.recv().await {
        let BoardRequest { client_id, event } = req;

        match event {
            ClientEvent::Joined { user } => {
                info!(client = client_id.0, %user, "joined the board");
                // Late joiners get the conversation so far in one push.
                if !chat_history.is_empty() {
                    send_to(
                        &clients,
                        client_id,
                        Update::Chat {
                            messages: chat_history.clone(),
                        },
                    )
                    .await;
                }
                sessions.insert(
                    client_id,
                    ClientState {
                        user,
                        subscriptions: IndexSet::new(),
                    },
                );
            }
            ClientEvent::Left => {
                if let Some(state) = sessions.remove(&client_id) {
                    info!(client = client_id.0, user = %state.user, "left the board");
                }
            }
            ClientEvent::Command(command) => {
                handle_command(
                    &mut model,
                    &mut sessions,
                    &mut chat_history,
                    &clients,
                    client_id,
                    command,
                )
                .await;
            }
        }
    }

    info!("board loop shutting down (board_rx closed)");
}

async fn handle_command(
    model: &mut BoardModel,
    sessions: &mut HashMap<ClientId, ClientState>,
    chat_history: &mut Vec<ChatMessage>,
    clients: &ClientRegistry,
    client_id: ClientId,
    command: Command,
) {
    match command {
        Command::Get(filter) => {
            send_to(clients, client_id, Update::Name(model.catalog(filter))).await;
        }
        Command::Plan(key) => match model.plan_for(&key) {
            Some(update) => send_to(clients, client_id, Update::Plan(update)).await,
            None => debug!(client = client_id.0, %key, "plan request for unknown entity"),
        },
        Command::Register(key) => {
            if !model.contains(&key) {
                debug!(client = client_id.0, %key, "subscribe request for unknown entity");
                return;
            }
            if let Some(state) = sessions.get_mut(&client_id) {
                state.subscriptions.insert(key);
            }
        }
        Command::Unregister(key) => {
            if let Some(state) = sessions.get_mut(&client_id) {
                state.subscriptions.shift_remove(&key);
            }
        }
        Command::Solve(solve) => {
            let outcome = model.solve(&solve);
            push_solve_results(model, sessions, clients, &outcome).await;
        }
        Command::Chat(text) => {
            let user = sessions
                .get(&client_id)
                .map(|s| s.user.as_str())
                .unwrap_or("?");
            let message = ChatMessage::now(user, text);
            chat_history.push(message.clone());
            if chat_history.len() > CHAT_HISTORY_LIMIT {
                let excess = chat_history.len() - CHAT_HISTORY_LIMIT;
                chat_history.drain(..excess);
            }
            broadcast(
                clients,
                Update::Chat {
                    messages: vec![message],
                },
            )
            .await;
        }
        Command::Status => {
            info!(clients = sessions.len(), "session table");
            for (id, state) in sessions.iter() {
                info!(
                    client = id.0,
                    user = %state.user,
                    subscriptions = state.subscriptions.len(),
                    "session"
                );
            }
        }
    }
}

/// Push the post-solve state to every client: its subscribed entities
/// plus whichever demands the solve changed.
async fn push_solve_results(
    model: &BoardModel,
    sessions: &HashMap<ClientId, ClientState>,
    clients: &ClientRegistry,
    outcome: &SolveOutcome,
) {
    if outcome.is_empty() {
        return;
    }

    // Snapshot of current clients to minimize lock hold time.
    let snapshot = {
        let guard = clients.read().await;
        guard.clone()
    };

    for (client_id, tx) in snapshot.iter() {
        let Some(state) = sessions.get(client_id) else {
            continue;
        };

        let mut update = PlanUpdate::default();
        for key in &state.subscriptions {
            model.append_plan(key, &mut update);
        }

        // Changed demands are included even for unsubscribed clients,
        // so every open board sees demand state move.
        match outcome {
            SolveOutcome::AllDemands => {
                for name in model.demand_names() {
                    let key = EntityKey::demand(name);
                    if !state.subscriptions.contains(&key) {
                        model.append_plan(&key, &mut update);
                    }
                }
            }
            SolveOutcome::Demands(names) => {
                for name in names {
                    let key = EntityKey::demand(name.clone());
                    if !state.subscriptions.contains(&key) {
                        model.append_plan(&key, &mut update);
                    }
                }
            }
        }

        if update.is_empty() {
            continue;
        }
        let _ = tx.send(Outbound::Update(Update::Plan(update)));
    }
}

async fn send_to(clients: &ClientRegistry, client_id: ClientId, update: Update) {
    let guard = clients.read().await;
    if let Some(tx) = guard.get(&client_id) {
        let _ = tx.send(Outbound::Update(update));
    }
}

async fn broadcast(clients: &ClientRegistry, update: Update) {
    let guard = clients.read().await;
    for tx in guard.values() {
        let _ = tx.send(Outbound::Update(update.clone()));
    }
}
