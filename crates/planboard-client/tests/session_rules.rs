// crates/planboard-client/tests/session_rules.rs
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use planboard_client::app::{App, CHAT_LIMIT};
use planboard_client::prefs::{self, FilePreferenceStore, MemoryStore, PreferenceStore};
use planboard_client::session::{
    plan_demands_backward, plan_demands_forward, unplan_demands, RenderAdapter, RenderHandle,
    SubscriptionRegistry,
};
use planboard_core::{
    Catalog, ChatMessage, Command, DemandInfo, EntityKey, EntityKind, EntityPlan, LoadSpan,
    PlanUpdate, ResourcePlan, SolveCommand, Update,
};

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, day, 8, 0, 0).unwrap()
}

fn resource(name: &str) -> EntityKey {
    EntityKey::resource(name)
}

/// One plan push carrying load data for a single resource.
fn resource_plan(name: &str) -> PlanUpdate {
    PlanUpdate {
        resources: vec![ResourcePlan {
            name: name.to_string(),
            loadplans: vec![LoadSpan {
                start: ts(1),
                end: ts(2),
                quantity: 1.0,
            }],
        }],
        ..Default::default()
    }
}

#[derive(Debug, PartialEq)]
enum CanvasCall {
    Drawn(u64, String),
    Updated(u64),
    Moved(u64, u64),
    Removed(u64),
}

/// Records adapter calls so tests can assert exactly what the registry
/// asked the renderer to do.
#[derive(Default)]
struct RecordingCanvas {
    next: u64,
    calls: Vec<CanvasCall>,
}

impl RenderAdapter for RecordingCanvas {
    fn draw_row(&mut self, index: u64, key: &EntityKey, _plan: &EntityPlan) -> RenderHandle {
        let handle = RenderHandle(self.next);
        self.next += 1;
        self.calls.push(CanvasCall::Drawn(index, key.to_string()));
        handle
    }

    fn update_row(&mut self, handle: RenderHandle, _key: &EntityKey, _plan: &EntityPlan) {
        self.calls.push(CanvasCall::Updated(handle.0));
    }

    fn move_row(&mut self, handle: RenderHandle, new_index: u64) {
        self.calls.push(CanvasCall::Moved(handle.0, new_index));
    }

    fn remove_row(&mut self, handle: RenderHandle) {
        self.calls.push(CanvasCall::Removed(handle.0));
    }
}

// ---- Registry ----

#[test]
fn adding_rows_registers_then_plans_each_key() {
    let mut registry = SubscriptionRegistry::new();

    let commands = registry.add_selected(EntityKind::Resource, ["Paint line 1", "Oven"]);
    assert_eq!(
        commands,
        vec![
            Command::Register(resource("Paint line 1")),
            Command::Plan(resource("Paint line 1")),
            Command::Register(resource("Oven")),
            Command::Plan(resource("Oven")),
        ]
    );
    assert_eq!(registry.index_of(&resource("Paint line 1")), Some(0));
    assert_eq!(registry.index_of(&resource("Oven")), Some(1));

    // Adding the same names again sends nothing and changes nothing.
    let again = registry.add_selected(EntityKind::Resource, ["Oven", "Paint line 1"]);
    assert!(again.is_empty());
    assert_eq!(registry.len(), 2);
}

#[test]
fn rebuild_diffs_the_selection() {
    let mut registry = SubscriptionRegistry::new();
    let mut canvas = RecordingCanvas::default();
    registry.add_selected(EntityKind::Resource, ["A", "B", "C"]);

    // Draw all three rows; handles come out 0, 1, 2.
    registry.apply_plan(resource_plan("A"), &mut canvas);
    registry.apply_plan(resource_plan("B"), &mut canvas);
    registry.apply_plan(resource_plan("C"), &mut canvas);
    canvas.calls.clear();

    let selected = [resource("C"), resource("A"), resource("D")];
    let commands = registry.rebuild(&selected, &mut canvas);

    // Dropped rows unregister, added rows get a register/plan pair,
    // kept rows send nothing.
    assert_eq!(
        commands,
        vec![
            Command::Unregister(resource("B")),
            Command::Register(resource("D")),
            Command::Plan(resource("D")),
        ]
    );

    // Survivors are renumbered into the new order, keeping drawings.
    assert_eq!(registry.index_of(&resource("C")), Some(0));
    assert_eq!(registry.index_of(&resource("A")), Some(1));
    assert_eq!(registry.index_of(&resource("D")), Some(2));
    assert_eq!(
        canvas.calls,
        vec![
            CanvasCall::Removed(1),
            CanvasCall::Moved(2, 0),
            CanvasCall::Moved(0, 1),
        ]
    );

    // The kept drawing keeps receiving updates through the old handle.
    registry.apply_plan(resource_plan("A"), &mut canvas);
    assert_eq!(canvas.calls.last(), Some(&CanvasCall::Updated(0)));
}

#[test]
fn duplicate_selections_collapse_to_the_first_occurrence() {
    let mut registry = SubscriptionRegistry::new();
    let mut canvas = RecordingCanvas::default();

    let selected = [resource("A"), resource("B"), resource("A")];
    let commands = registry.rebuild(&selected, &mut canvas);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.index_of(&resource("A")), Some(0));
    assert_eq!(registry.index_of(&resource("B")), Some(1));
    assert_eq!(
        commands,
        vec![
            Command::Register(resource("A")),
            Command::Plan(resource("A")),
            Command::Register(resource("B")),
            Command::Plan(resource("B")),
        ]
    );
}

#[test]
fn indices_continue_climbing_after_a_rebuild() {
    let mut registry = SubscriptionRegistry::new();
    let mut canvas = RecordingCanvas::default();
    registry.add_selected(EntityKind::Resource, ["A", "B"]);

    registry.rebuild(&[resource("B")], &mut canvas);
    assert_eq!(registry.index_of(&resource("B")), Some(0));

    let commands = registry.add_selected(EntityKind::Resource, ["C"]);
    assert_eq!(commands.len(), 2);
    assert_eq!(registry.index_of(&resource("C")), Some(1));
}

#[test]
fn plan_data_lands_only_on_tracked_rows() {
    let mut registry = SubscriptionRegistry::new();
    let mut canvas = RecordingCanvas::default();
    registry.add_selected(EntityKind::Resource, ["A"]);

    let mut update = resource_plan("A");
    update.resources.push(ResourcePlan {
        name: "ghost".to_string(),
        loadplans: vec![],
    });
    registry.apply_plan(update, &mut canvas);

    // The untracked row triggered no adapter call at all.
    assert_eq!(
        canvas.calls,
        vec![CanvasCall::Drawn(0, "resource/A".to_string())]
    );

    // A second delivery reuses the handle instead of redrawing.
    registry.apply_plan(resource_plan("A"), &mut canvas);
    assert_eq!(canvas.calls.len(), 2);
    assert_eq!(canvas.calls.last(), Some(&CanvasCall::Updated(0)));
}

#[test]
fn reconnects_replay_every_row_in_order() {
    let mut registry = SubscriptionRegistry::new();
    let mut canvas = RecordingCanvas::default();
    registry.add_selected(EntityKind::Resource, ["A"]);
    registry.add_selected(EntityKind::Demand, ["D-100"]);
    registry.apply_plan(resource_plan("A"), &mut canvas);
    canvas.calls.clear();

    let replay = registry.reannounce();
    assert_eq!(
        replay,
        vec![
            Command::Register(resource("A")),
            Command::Plan(resource("A")),
            Command::Register(EntityKey::demand("D-100")),
            Command::Plan(EntityKey::demand("D-100")),
        ]
    );

    // Replaying is pure output: indices and drawings are untouched.
    assert_eq!(registry.index_of(&resource("A")), Some(0));
    assert!(canvas.calls.is_empty());
}

// ---- Demand actions ----

#[test]
fn full_selections_collapse_to_bulk_solves() {
    let names: Vec<String> = vec!["D-100".into(), "D-101".into(), "D-102".into()];

    assert_eq!(
        plan_demands_forward(&names, 3),
        vec![Command::Solve(SolveCommand::ReplanForward)]
    );
    assert_eq!(
        plan_demands_backward(&names, 3),
        vec![Command::Solve(SolveCommand::ReplanBackward)]
    );
    assert_eq!(
        unplan_demands(&names, 3),
        vec![Command::Solve(SolveCommand::Erase)]
    );
}

#[test]
fn partial_selections_solve_row_by_row() {
    let names: Vec<String> = vec!["D-101".into(), "D-100".into()];

    assert_eq!(
        plan_demands_forward(&names, 3),
        vec![
            Command::Solve(SolveCommand::DemandForward("D-101".to_string())),
            Command::Solve(SolveCommand::DemandForward("D-100".to_string())),
        ]
    );
    assert_eq!(
        unplan_demands(&names, 3),
        vec![
            Command::Solve(SolveCommand::Unplan("D-101".to_string())),
            Command::Solve(SolveCommand::Unplan("D-100".to_string())),
        ]
    );
    assert!(unplan_demands(&[], 3).is_empty());
}

// ---- Preference store ----

#[tokio::test]
async fn layouts_round_trip_through_the_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FilePreferenceStore::at(dir.path().join("settings.json"));

    let rows = vec![resource("Paint line 1"), EntityKey::demand("D-100")];
    store
        .save("planningboard", &prefs::rows_to_value(&rows))
        .await
        .expect("save");

    let loaded = store
        .load("planningboard")
        .await
        .expect("load")
        .expect("layout present");
    assert_eq!(prefs::rows_from_value(&loaded), rows);

    // Another report key shares the file without clobbering ours.
    store
        .save("other", &json!({ "rows": [] }))
        .await
        .expect("save");
    let still_there = store.load("planningboard").await.expect("load");
    assert!(still_there.is_some());
}

#[tokio::test]
async fn the_memory_store_round_trips_too() {
    let store = MemoryStore::default();
    let rows = vec![EntityKey::operation("Assemble widget"), resource("M1")];

    store
        .save("planningboard", &prefs::rows_to_value(&rows))
        .await
        .expect("save");
    let loaded = store
        .load("planningboard")
        .await
        .expect("load")
        .expect("layout present");
    assert_eq!(prefs::rows_from_value(&loaded), rows);

    assert!(store.load("other").await.expect("load").is_none());
}

#[test]
fn unreadable_layout_rows_are_skipped() {
    let value = json!({ "rows": ["resource/Paint line 1", "bogus", 7, "demand/D-100"] });
    assert_eq!(
        prefs::rows_from_value(&value),
        vec![resource("Paint line 1"), EntityKey::demand("D-100")]
    );
    assert!(prefs::rows_from_value(&json!({})).is_empty());
}

// ---- App ----

fn demand_catalog() -> Catalog {
    Catalog {
        demands: vec![DemandInfo {
            name: "D-100".to_string(),
            item: "widget".to_string(),
            customer: "ACME".to_string(),
            quantity: 10.0,
            due: ts(10),
            priority: 1,
        }],
        ..Default::default()
    }
}

#[test]
fn board_changes_queue_exactly_one_save() {
    let mut app = App::new("anna", "planningboard");
    assert!(app.take_pending_persist().is_none());

    app.catalog = demand_catalog();
    app.selected_demands.insert("D-100".to_string());
    app.track_selected_demands();

    let rows = app.take_pending_persist().expect("rows to save");
    assert_eq!(rows, vec![EntityKey::demand("D-100")]);
    assert!(app.take_pending_persist().is_none());
}

#[test]
fn a_failed_save_blocks_with_a_notice() {
    let mut app = App::new("anna", "planningboard");
    app.notify_persist_failure("endpoint went away");
    let notice = app.notice.as_deref().expect("notice");
    assert!(notice.contains("endpoint went away"));

    app.dismiss_notice();
    assert!(app.notice.is_none());
}

#[test]
fn chat_stays_capped_and_unknown_updates_change_nothing() {
    let mut app = App::new("anna", "planningboard");
    for i in 0..CHAT_LIMIT + 5 {
        app.handle_update(Update::Chat {
            messages: vec![ChatMessage::now("anna", format!("line {i}"))],
        });
    }
    assert_eq!(app.chat.len(), CHAT_LIMIT);
    let first = app.chat.front().expect("first line");
    assert_eq!(first.value, "line 5");

    app.handle_update(Update::Unknown);
    assert_eq!(app.chat.len(), CHAT_LIMIT);
    assert!(app.board.is_empty());
}
