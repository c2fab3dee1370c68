// crates/planboard-client/tests/live_session.rs
use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::timeout;

use planboard_client::session::{Connection, ConnectionState, SessionEvent};
use planboard_core::{Command, EntityKey, EntityKind, Update};
use planboard_protocol::session_url;
use planboard_server::config::Config;
use planboard_server::server;

const SECRET: &str = "test-secret";

async fn start_server() -> SocketAddr {
    let config = Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        max_clients: 20,
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

async fn next_event(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a session event")
        .expect("event channel closed")
}

#[tokio::test]
async fn dialing_a_dead_endpoint_leaves_the_link_closed() {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut connection = Connection::new(events_tx);
    assert_eq!(connection.state(), ConnectionState::Closed);

    // Nothing listens on port 9; the dial fails instead of panicking.
    let opened = connection
        .connect("ws://127.0.0.1:9/board?user=anna&time=0&token=junk")
        .await;
    assert!(!opened);
    assert_eq!(connection.state(), ConnectionState::Closed);
    assert!(matches!(
        next_event(&mut events_rx).await,
        SessionEvent::Disconnected
    ));
}

#[tokio::test]
async fn commands_outside_an_open_link_are_dropped() {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut connection = Connection::new(events_tx);

    // Both are no-ops while the link is closed; nothing is queued for
    // a later session.
    connection.send(&Command::Get(None)).await;
    connection.disconnect().await;
    assert_eq!(connection.state(), ConnectionState::Closed);
    assert!(events_rx.try_recv().is_err());
}

#[tokio::test]
async fn a_full_session_round_trip() {
    let addr = start_server().await;
    let url = session_url(
        &format!("ws://{addr}/board"),
        "anna",
        SECRET,
        3600,
        Utc::now().timestamp(),
    )
    .expect("url");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    let mut connection = Connection::new(events_tx);
    assert!(connection.connect(url.as_str()).await);
    assert!(connection.is_open());
    assert!(matches!(
        next_event(&mut events_rx).await,
        SessionEvent::Connected
    ));

    let link = tokio::spawn(async move {
        connection.run(&mut command_rx).await;
    });

    // Catalog request and reply.
    command_tx.send(Command::Get(None)).expect("send");
    let catalog = match next_event(&mut events_rx).await {
        SessionEvent::Update(Update::Name(catalog)) => catalog,
        other => panic!("expected a catalog, got {other:?}"),
    };
    assert!(!catalog.demands.is_empty());

    // Subscribe to a resource and ask for its plan.
    let key = EntityKey::new(EntityKind::Resource, "Paint line 1");
    command_tx.send(Command::Register(key.clone())).expect("send");
    command_tx.send(Command::Plan(key)).expect("send");
    let plan = match next_event(&mut events_rx).await {
        SessionEvent::Update(Update::Plan(plan)) => plan,
        other => panic!("expected plan data, got {other:?}"),
    };
    assert!(plan.resources.iter().any(|r| r.name == "Paint line 1"));

    // Dropping the command channel closes the session cleanly.
    drop(command_tx);
    assert!(matches!(
        next_event(&mut events_rx).await,
        SessionEvent::Disconnected
    ));
    link.await.expect("link task");
}
