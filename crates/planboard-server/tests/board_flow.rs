// crates/planboard-server/tests/board_flow.rs
use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use planboard_core::{Catalog, ChatMessage, Command, EntityKey, EntityKind, PlanUpdate, SolveCommand, Update};
use planboard_protocol::{decode_update, encode_command, session_url};
use planboard_server::config::Config;
use planboard_server::server;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const SECRET: &str = "test-secret";

async fn start_server(max_clients: usize) -> SocketAddr {
    let config = Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        max_clients,
        secret_key: SECRET.to_string(),
        model_path: None,
    };
    let bound = server::bind(config).await.expect("bind");
    let addr = bound.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = bound.run().await;
    });
    addr
}

async fn join(addr: SocketAddr, user: &str) -> Socket {
    let now = chrono::Utc::now().timestamp();
    let url = session_url(&format!("ws://{addr}/board"), user, SECRET, 3600, now).expect("url");
    let (ws, _) = connect_async(url.as_str()).await.expect("connect");
    ws
}

async fn send(ws: &mut Socket, command: &Command) {
    ws.send(Message::Text(encode_command(command)))
        .await
        .expect("send");
}

async fn next_update(ws: &mut Socket) -> Update {
    loop {
        let frame = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for an update")
            .expect("stream ended")
            .expect("read");
        if let Message::Text(text) = frame {
            return decode_update(&text).expect("decode");
        }
    }
}

fn as_catalog(update: Update) -> Catalog {
    match update {
        Update::Name(catalog) => catalog,
        other => panic!("expected a catalog, got {other:?}"),
    }
}

fn as_plan(update: Update) -> PlanUpdate {
    match update {
        Update::Plan(plan) => plan,
        other => panic!("expected plan data, got {other:?}"),
    }
}

fn as_chat(update: Update) -> Vec<ChatMessage> {
    match update {
        Update::Chat { messages } => messages,
        other => panic!("expected chat, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_requests_round_trip() {
    let addr = start_server(20).await;
    let mut ws = join(addr, "paul").await;

    send(&mut ws, &Command::Get(None)).await;
    let catalog = as_catalog(next_update(&mut ws).await);
    assert!(catalog.items.contains(&"widget".to_string()));
    assert!(catalog.operations.contains(&"Assemble widget".to_string()));
    assert!(catalog.resources.contains(&"Paint line 1".to_string()));
    assert!(catalog.buffers.contains(&"widget @ factory".to_string()));
    let demand = catalog.demand("D-100").expect("demo demand");
    assert_eq!(demand.customer, "ACME");
    assert_eq!(demand.quantity, 10.0);

    // Filtered request: only the demand section, no items.
    send(&mut ws, &Command::Get(Some(EntityKind::Demand))).await;
    let filtered = as_catalog(next_update(&mut ws).await);
    assert!(filtered.items.is_empty());
    assert!(filtered.operations.is_empty());
    assert_eq!(filtered.demands.len(), 3);
}

#[tokio::test]
async fn solve_pushes_are_filtered_per_subscriber() {
    let addr = start_server(20).await;
    let mut a = join(addr, "anna").await;
    let mut b = join(addr, "ben").await;

    // Round-trip a request on ben's session so his registration is
    // fully processed before the solve below fans out.
    send(&mut b, &Command::Get(None)).await;
    let _ = next_update(&mut b).await;

    // anna watches one resource; ben watches nothing.
    send(&mut a, &Command::Register(EntityKey::resource("Paint line 1"))).await;
    send(&mut a, &Command::Plan(EntityKey::resource("Paint line 1"))).await;
    let reply = as_plan(next_update(&mut a).await);
    assert_eq!(reply.resources.len(), 1);
    assert_eq!(reply.resources[0].name, "Paint line 1");
    assert_eq!(reply.resources[0].loadplans.len(), 2);

    send(
        &mut a,
        &Command::Solve(SolveCommand::DemandForward("D-100".into())),
    )
    .await;

    // anna: her subscription plus the changed demand.
    let push = as_plan(next_update(&mut a).await);
    assert_eq!(push.resources.len(), 1);
    assert_eq!(push.demands.len(), 1);
    assert_eq!(push.demands[0].name, "D-100");
    assert_eq!(push.demands[0].detail.planned, 10.0);
    assert_eq!(push.demands[0].detail.deliveries.len(), 1);

    // ben: no subscriptions, but the changed demand still arrives.
    let push = as_plan(next_update(&mut b).await);
    assert!(push.resources.is_empty());
    assert_eq!(push.demands.len(), 1);
    assert_eq!(push.demands[0].name, "D-100");
}

#[tokio::test]
async fn bulk_solves_cover_every_demand() {
    let addr = start_server(20).await;
    let mut ws = join(addr, "paul").await;

    send(&mut ws, &Command::Solve(SolveCommand::ReplanBackward)).await;
    let push = as_plan(next_update(&mut ws).await);
    assert_eq!(push.demands.len(), 3);
    for demand in &push.demands {
        assert_eq!(demand.detail.planned, demand.detail.quantity);
        // Backward planning lands the delivery on the due date.
        assert_eq!(push_end(demand), demand.detail.due);
    }

    send(&mut ws, &Command::Solve(SolveCommand::Erase)).await;
    let push = as_plan(next_update(&mut ws).await);
    assert_eq!(push.demands.len(), 3);
    for demand in &push.demands {
        assert_eq!(demand.detail.planned, 0.0);
        assert!(demand.detail.deliveries.is_empty());
    }
}

fn push_end(demand: &planboard_core::DemandPlan) -> chrono::DateTime<chrono::Utc> {
    demand.detail.deliveries.last().expect("delivery").end
}

#[tokio::test]
async fn chat_is_broadcast_and_replayed_to_joiners() {
    let addr = start_server(20).await;
    let mut a = join(addr, "anna").await;
    let mut b = join(addr, "ben").await;

    // Make sure ben is fully registered before anna speaks.
    send(&mut b, &Command::Get(None)).await;
    let _ = next_update(&mut b).await;

    send(&mut a, &Command::Chat("morning all".into())).await;

    let messages = as_chat(next_update(&mut a).await);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].name, "anna");
    assert_eq!(messages[0].value, "morning all");

    let messages = as_chat(next_update(&mut b).await);
    assert_eq!(messages[0].value, "morning all");

    // A late joiner gets the history as the first push.
    let mut c = join(addr, "cleo").await;
    let messages = as_chat(next_update(&mut c).await);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].name, "anna");
}

#[tokio::test]
async fn plan_requests_for_unknown_entities_get_no_reply() {
    let addr = start_server(20).await;
    let mut ws = join(addr, "paul").await;

    send(&mut ws, &Command::Plan(EntityKey::resource("No such line"))).await;
    send(&mut ws, &Command::Get(Some(EntityKind::Resource))).await;

    // Commands are processed in order; if the bogus plan request had
    // produced a reply it would arrive before the catalog.
    let catalog = as_catalog(next_update(&mut ws).await);
    assert_eq!(catalog.resources.len(), 3);
}

#[tokio::test]
async fn bad_tokens_are_refused_at_the_handshake() {
    let addr = start_server(20).await;
    let now = chrono::Utc::now().timestamp();
    let url = session_url(&format!("ws://{addr}/board"), "paul", "wrong-secret", 3600, now)
        .expect("url");
    assert!(connect_async(url.as_str()).await.is_err());

    // Valid credentials still work against the same server.
    let mut ws = join(addr, "paul").await;
    send(&mut ws, &Command::Get(None)).await;
    let _ = next_update(&mut ws).await;
}

#[tokio::test]
async fn the_client_limit_is_enforced() {
    let addr = start_server(1).await;

    let mut first = join(addr, "anna").await;
    // Round-trip a command so the first session is fully registered.
    send(&mut first, &Command::Get(None)).await;
    let _ = next_update(&mut first).await;

    let now = chrono::Utc::now().timestamp();
    let url = session_url(&format!("ws://{addr}/board"), "ben", SECRET, 3600, now).expect("url");
    assert!(connect_async(url.as_str()).await.is_err());
}
