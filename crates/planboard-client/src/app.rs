// crates/planboard-client/src/app.rs

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use planboard_core::{Catalog, ChatMessage, Command, EntityKey, EntityKind, EntityPlan, Update};

use crate::session::{
    plan_demands_backward, plan_demands_forward, unplan_demands, RenderAdapter, RenderHandle,
    SessionEvent, SubscriptionRegistry,
};

/// Chat lines kept on screen. Matches what the server replays.
pub const CHAT_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Board,
    Demands,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a chat line.
    Chat,
}

/// One drawn board row.
#[derive(Debug, Clone)]
pub struct BoardRow {
    pub index: u64,
    pub key: EntityKey,
    pub plan: EntityPlan,
}

/// The drawn rows of the board, keyed by render handle.
///
/// This is the terminal renderer behind the registry's adapter seam:
/// it only stores what to draw, the actual painting happens in the
/// board component each frame.
#[derive(Debug, Default)]
pub struct BoardView {
    rows: IndexMap<u64, BoardRow>,
    next_handle: u64,
}

impl BoardView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted by display position.
    pub fn rows_in_order(&self) -> Vec<&BoardRow> {
        let mut rows: Vec<&BoardRow> = self.rows.values().collect();
        rows.sort_by_key(|row| row.index);
        rows
    }
}

impl RenderAdapter for BoardView {
    fn draw_row(&mut self, index: u64, key: &EntityKey, plan: &EntityPlan) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.rows.insert(
            handle.0,
            BoardRow {
                index,
                key: key.clone(),
                plan: plan.clone(),
            },
        );
        handle
    }

    fn update_row(&mut self, handle: RenderHandle, _key: &EntityKey, plan: &EntityPlan) {
        if let Some(row) = self.rows.get_mut(&handle.0) {
            row.plan = plan.clone();
        }
    }

    fn move_row(&mut self, handle: RenderHandle, new_index: u64) {
        if let Some(row) = self.rows.get_mut(&handle.0) {
            row.index = new_index;
        }
    }

    fn remove_row(&mut self, handle: RenderHandle) {
        self.rows.shift_remove(&handle.0);
    }
}

/// State of the customize dialog.
#[derive(Debug)]
pub struct PickerState {
    /// Which of the four kinds is shown.
    pub kind_cursor: usize,
    /// Highlighted name in the current kind's list.
    pub name_cursor: usize,
    /// Running selection, seeded from the current board rows.
    pub chosen: IndexSet<EntityKey>,
}

pub struct App {
    pub user: String,
    pub prefs_key: String,
    pub connected: bool,
    pub should_quit: bool,

    pub current_panel: Panel,
    pub input_mode: InputMode,
    pub show_help: bool,
    /// A blocking message; dismissed with Enter or Esc.
    pub notice: Option<String>,

    pub catalog: Catalog,
    pub registry: SubscriptionRegistry,
    pub board: BoardView,
    pub board_scroll: usize,

    pub chat: VecDeque<ChatMessage>,
    pub chat_input: String,

    pub demand_cursor: usize,
    pub selected_demands: IndexSet<String>,

    pub picker: Option<PickerState>,

    network_tx: Option<UnboundedSender<Command>>,
    pending_persist: bool,
}

impl App {
    pub fn new(user: impl Into<String>, prefs_key: impl Into<String>) -> Self {
        App {
            user: user.into(),
            prefs_key: prefs_key.into(),
            connected: false,
            should_quit: false,
            current_panel: Panel::Board,
            input_mode: InputMode::Normal,
            show_help: false,
            notice: None,
            catalog: Catalog::default(),
            registry: SubscriptionRegistry::new(),
            board: BoardView::default(),
            board_scroll: 0,
            chat: VecDeque::new(),
            chat_input: String::new(),
            demand_cursor: 0,
            selected_demands: IndexSet::new(),
            picker: None,
            network_tx: None,
            pending_persist: false,
        }
    }

    /// Wire the app to the current session task.
    pub fn set_network_sender(&mut self, tx: UnboundedSender<Command>) {
        self.network_tx = Some(tx);
    }

    pub fn send_command(&self, command: Command) {
        if let Some(tx) = &self.network_tx {
            // A dead channel means the session is gone; the command is
            // dropped, never queued for the next one.
            let _ = tx.send(command);
        }
    }

    pub fn send_commands(&self, commands: Vec<Command>) {
        for command in commands {
            self.send_command(command);
        }
    }

    // ---- Session events ----

    /// Fold one session event into the app state. On `Connected` the
    /// caller follows up with `on_connected` once saved rows are in
    /// hand.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => {
                self.connected = true;
            }
            SessionEvent::Update(update) => self.handle_update(update),
            SessionEvent::Disconnected => {
                self.connected = false;
            }
        }
    }

    /// Commands to open a session with: a catalog request, then the
    /// board rows. A first connect restores `saved_rows`; a reconnect
    /// replays what is already on the board.
    pub fn on_connected(&mut self, saved_rows: &[EntityKey]) -> Vec<Command> {
        let mut commands = vec![Command::Get(None)];
        if self.registry.is_empty() {
            commands.extend(self.registry.rebuild(saved_rows, &mut self.board));
        } else {
            commands.extend(self.registry.reannounce());
        }
        commands
    }

    pub fn handle_update(&mut self, update: Update) {
        match update {
            Update::Name(catalog) => {
                self.catalog = catalog;
                self.prune_demand_selection();
            }
            Update::Plan(plan) => {
                self.registry.apply_plan(plan, &mut self.board);
            }
            Update::Chat { messages } => {
                for message in messages {
                    self.chat.push_back(message);
                }
                while self.chat.len() > CHAT_LIMIT {
                    self.chat.pop_front();
                }
            }
            Update::Unknown => {
                debug!("ignoring update with an unknown category");
            }
        }
    }

    // ---- Panels ----

    pub fn next_panel(&mut self) {
        self.current_panel = match self.current_panel {
            Panel::Board => Panel::Demands,
            Panel::Demands => Panel::Chat,
            Panel::Chat => Panel::Board,
        };
    }

    pub fn previous_panel(&mut self) {
        self.current_panel = match self.current_panel {
            Panel::Board => Panel::Chat,
            Panel::Demands => Panel::Board,
            Panel::Chat => Panel::Demands,
        };
    }

    // ---- Demand table ----

    pub fn demand_cursor_up(&mut self) {
        self.demand_cursor = self.demand_cursor.saturating_sub(1);
    }

    pub fn demand_cursor_down(&mut self) {
        let last = self.catalog.demands.len().saturating_sub(1);
        if self.demand_cursor < last {
            self.demand_cursor += 1;
        }
    }

    pub fn toggle_demand_selected(&mut self) {
        let Some(info) = self.catalog.demands.get(self.demand_cursor) else {
            return;
        };
        let name = info.name.clone();
        if !self.selected_demands.shift_remove(&name) {
            self.selected_demands.insert(name);
        }
    }

    pub fn select_all_demands(&mut self) {
        for info in &self.catalog.demands {
            self.selected_demands.insert(info.name.clone());
        }
    }

    pub fn clear_demand_selection(&mut self) {
        self.selected_demands.clear();
    }

    fn prune_demand_selection(&mut self) {
        self.selected_demands
            .retain(|name| self.catalog.demand(name).is_some());
        let last = self.catalog.demands.len().saturating_sub(1);
        self.demand_cursor = self.demand_cursor.min(last);
    }

    fn selection(&self) -> Vec<String> {
        self.selected_demands.iter().cloned().collect()
    }

    // ---- Demand actions ----

    pub fn unplan_selected(&mut self) {
        let commands = unplan_demands(&self.selection(), self.catalog.demands.len());
        self.send_commands(commands);
    }

    pub fn plan_selected_forward(&mut self) {
        let commands = plan_demands_forward(&self.selection(), self.catalog.demands.len());
        self.send_commands(commands);
    }

    pub fn plan_selected_backward(&mut self) {
        let commands = plan_demands_backward(&self.selection(), self.catalog.demands.len());
        self.send_commands(commands);
    }

    /// Put the selected demands on the board as rows.
    pub fn track_selected_demands(&mut self) {
        let names = self.selection();
        if names.is_empty() {
            return;
        }
        let commands = self.registry.add_selected(EntityKind::Demand, names);
        if !commands.is_empty() {
            self.pending_persist = true;
        }
        self.send_commands(commands);
    }

    pub fn refresh_catalog(&self) {
        self.send_command(Command::Get(None));
    }

    // ---- Chat ----

    pub fn start_chat_input(&mut self) {
        self.current_panel = Panel::Chat;
        self.input_mode = InputMode::Chat;
    }

    pub fn cancel_chat_input(&mut self) {
        self.chat_input.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_chat(&mut self) {
        let text = self.chat_input.trim().to_string();
        self.chat_input.clear();
        self.input_mode = InputMode::Normal;
        if !text.is_empty() {
            self.send_command(Command::Chat(text));
        }
    }

    // ---- Customize dialog ----

    pub fn open_picker(&mut self) {
        let chosen: IndexSet<EntityKey> = self.registry.rows().into_iter().collect();
        self.picker = Some(PickerState {
            kind_cursor: 0,
            name_cursor: 0,
            chosen,
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_next_kind(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.kind_cursor = (picker.kind_cursor + 1) % EntityKind::ALL.len();
            picker.name_cursor = 0;
        }
    }

    pub fn picker_previous_kind(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.kind_cursor =
                (picker.kind_cursor + EntityKind::ALL.len() - 1) % EntityKind::ALL.len();
            picker.name_cursor = 0;
        }
    }

    pub fn picker_up(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.name_cursor = picker.name_cursor.saturating_sub(1);
        }
    }

    pub fn picker_down(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let kind = EntityKind::ALL[picker.kind_cursor];
        let last = self.catalog.names(kind).len().saturating_sub(1);
        if picker.name_cursor < last {
            picker.name_cursor += 1;
        }
    }

    /// Toggle the highlighted name in or out of the selection.
    pub fn picker_toggle(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let kind = EntityKind::ALL[picker.kind_cursor];
        let Some(name) = self.catalog.names(kind).get(picker.name_cursor).copied() else {
            return;
        };
        let key = EntityKey::new(kind, name);
        if !picker.chosen.shift_remove(&key) {
            picker.chosen.insert(key);
        }
    }

    /// Apply the dialog: reshape the board to the chosen keys and
    /// queue a layout save.
    pub fn apply_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let selected: Vec<EntityKey> = picker.chosen.into_iter().collect();
        let commands = self.registry.rebuild(&selected, &mut self.board);
        self.pending_persist = true;
        self.send_commands(commands);
    }

    // ---- Layout persistence ----

    /// Rows to save, if an action changed the board since last asked.
    pub fn take_pending_persist(&mut self) -> Option<Vec<EntityKey>> {
        if !self.pending_persist {
            return None;
        }
        self.pending_persist = false;
        Some(self.registry.rows())
    }

    /// Saving failed; block the screen until the user acknowledges.
    pub fn notify_persist_failure(&mut self, error: impl std::fmt::Display) {
        warn!(%error, "saving the board layout failed");
        self.notice = Some(format!("Saving the board layout failed: {error}"));
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
