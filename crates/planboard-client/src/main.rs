// crates/planboard-client/src/main.rs

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use planboard_client::app::{App, InputMode, Panel};
use planboard_client::config::ClientConfig;
use planboard_client::prefs::{
    self, FilePreferenceStore, HttpPreferenceStore, MemoryStore, PreferenceStore,
};
use planboard_client::session::{Connection, SessionEvent};
use planboard_client::ui;
use planboard_core::{Command, EntityKey};
use planboard_protocol::session_url;

#[derive(Parser)]
#[clap(name = "planboard-client")]
#[clap(about = "Terminal planning board")]
struct Cli {
    /// Config file
    #[clap(short, long, default_value = "planboard.toml")]
    config: String,

    /// Server WebSocket URL, overrides the config file
    #[clap(short, long)]
    server: Option<String>,

    /// Login name, overrides the config file
    #[clap(short, long)]
    user: Option<String>,

    /// Log at debug level
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(Path::new(&cli.config))?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(user) = cli.user {
        config.user = user;
    }

    // The terminal owns stdout, so logs go to a file.
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| "planboard-client.log".to_string());
    let path = Path::new(&log_path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path
        .file_name()
        .map(|f| f.to_os_string())
        .unwrap_or_else(|| "planboard-client.log".into());
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!(user = %config.user, server = %config.server_url, "starting the planning board");

    let store: Arc<dyn PreferenceStore> = match &config.prefs_url {
        Some(url) => Arc::new(HttpPreferenceStore::new(url.clone())),
        None => match FilePreferenceStore::in_config_dir() {
            Some(file_store) => Arc::new(file_store),
            None => Arc::new(MemoryStore::default()),
        },
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config.user.clone(), config.prefs_key.clone());
    let result = run_app(&mut terminal, app, config, store).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "exited with an error");
    }
    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    config: ClientConfig,
    store: Arc<dyn PreferenceStore>,
) -> Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let (network_tx, handle) = spawn_session(&config, events_tx.clone())?;
    app.set_network_sender(network_tx);
    let mut session = Some(handle);

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(
                        &mut app,
                        key.code,
                        key.modifiers,
                        &config,
                        &events_tx,
                        &mut session,
                    )?;
                }
            }
        }

        while let Ok(session_event) = events_rx.try_recv() {
            let just_connected = matches!(session_event, SessionEvent::Connected);
            app.handle_session_event(session_event);
            if just_connected {
                let saved = load_saved_rows(store.as_ref(), &app.prefs_key).await;
                let commands = app.on_connected(&saved);
                app.send_commands(commands);
            }
        }

        if let Some(rows) = app.take_pending_persist() {
            let value = prefs::rows_to_value(&rows);
            if let Err(e) = store.save(&app.prefs_key, &value).await {
                app.notify_persist_failure(e);
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Dropping the app drops the command channel; the session task
    // answers with a clean close before it ends.
    drop(app);
    if let Some(handle) = session.take() {
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
    }
    Ok(())
}

/// One session attempt: a fresh login URL, a fresh command channel and
/// a task that dials and then drives the link until it dies.
fn spawn_session(
    config: &ClientConfig,
    events_tx: UnboundedSender<SessionEvent>,
) -> Result<(UnboundedSender<Command>, JoinHandle<()>)> {
    let url = session_url(
        &config.server_url,
        &config.user,
        &config.secret_key,
        config.session_ttl_secs,
        Utc::now().timestamp(),
    )?;
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let mut connection = Connection::new(events_tx);
        if connection.connect(url.as_str()).await {
            connection.run(&mut command_rx).await;
        }
    });
    Ok((command_tx, handle))
}

async fn load_saved_rows(store: &dyn PreferenceStore, key: &str) -> Vec<EntityKey> {
    match store.load(key).await {
        Ok(Some(value)) => prefs::rows_from_value(&value),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "loading the saved board layout failed");
            Vec::new()
        }
    }
}

fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config: &ClientConfig,
    events_tx: &UnboundedSender<SessionEvent>,
    session: &mut Option<JoinHandle<()>>,
) -> Result<()> {
    // The notice blocks everything until acknowledged.
    if app.notice.is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
        return Ok(());
    }

    if app.show_help {
        if matches!(code, KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(());
    }

    if app.picker.is_some() {
        match code {
            KeyCode::Esc => app.close_picker(),
            KeyCode::Enter => app.apply_picker(),
            KeyCode::Char(' ') => app.picker_toggle(),
            KeyCode::Tab | KeyCode::Right => app.picker_next_kind(),
            KeyCode::BackTab | KeyCode::Left => app.picker_previous_kind(),
            KeyCode::Up => app.picker_up(),
            KeyCode::Down => app.picker_down(),
            _ => {}
        }
        return Ok(());
    }

    if matches!(app.input_mode, InputMode::Chat) {
        match code {
            KeyCode::Enter => app.submit_chat(),
            KeyCode::Esc => app.cancel_chat_input(),
            KeyCode::Backspace => {
                app.chat_input.pop();
            }
            KeyCode::Char(c) => app.chat_input.push(c),
            _ => {}
        }
        return Ok(());
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        KeyCode::F(1) => app.show_help = true,
        KeyCode::Tab => app.next_panel(),
        KeyCode::BackTab => app.previous_panel(),
        KeyCode::Char('c') => app.open_picker(),
        KeyCode::Char('g') => app.refresh_catalog(),
        KeyCode::Char('r') if !app.connected => {
            let (tx, handle) = spawn_session(config, events_tx.clone())?;
            app.set_network_sender(tx);
            *session = Some(handle);
        }
        KeyCode::Up => match app.current_panel {
            Panel::Board => app.board_scroll = app.board_scroll.saturating_sub(1),
            Panel::Demands => app.demand_cursor_up(),
            Panel::Chat => {}
        },
        KeyCode::Down => match app.current_panel {
            Panel::Board => {
                let last = app.board.len().saturating_sub(1);
                app.board_scroll = (app.board_scroll + 1).min(last);
            }
            Panel::Demands => app.demand_cursor_down(),
            Panel::Chat => {}
        },
        KeyCode::Enter if matches!(app.current_panel, Panel::Chat) => app.start_chat_input(),
        KeyCode::Char(' ') if matches!(app.current_panel, Panel::Demands) => {
            app.toggle_demand_selected()
        }
        KeyCode::Char('a') if matches!(app.current_panel, Panel::Demands) => {
            app.select_all_demands()
        }
        KeyCode::Char('n') if matches!(app.current_panel, Panel::Demands) => {
            app.clear_demand_selection()
        }
        KeyCode::Char('t') if matches!(app.current_panel, Panel::Demands) => {
            app.track_selected_demands()
        }
        KeyCode::Char('f') if matches!(app.current_panel, Panel::Demands) => {
            app.plan_selected_forward()
        }
        KeyCode::Char('b') if matches!(app.current_panel, Panel::Demands) => {
            app.plan_selected_backward()
        }
        KeyCode::Char('u') if matches!(app.current_panel, Panel::Demands) => app.unplan_selected(),
        _ => {}
    }
    Ok(())
}
