//! Subscription bookkeeping for the board.
//!
//! The registry owns the set of tracked rows, their display order and
//! their render handles. It never talks to the network itself: every
//! mutating operation returns the commands the caller should send, in
//! the order they should go out.

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use planboard_core::{Command, EntityKey, EntityKind, PlanUpdate};

use super::render::{RenderAdapter, RenderHandle};

/// One tracked row.
#[derive(Debug, Clone, Copy)]
pub struct Subscription {
    /// Display position. Assigned when the row is added, renumbered
    /// only by `rebuild`.
    pub index: u64,
    /// Set on the first plan delivery for the row.
    pub render: Option<RenderHandle>,
}

/// The set of rows the board is subscribed to.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: IndexMap<EntityKey, Subscription>,
    next_index: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_tracked(&self, key: &EntityKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn index_of(&self, key: &EntityKey) -> Option<u64> {
        self.entries.get(key).map(|sub| sub.index)
    }

    /// Tracked keys in display order.
    pub fn rows(&self) -> Vec<EntityKey> {
        self.entries.keys().cloned().collect()
    }

    /// Track every name of one kind that is not already on the board.
    ///
    /// Each new row gets the next free index and a register/plan pair
    /// in the returned commands, interleaved per entity. Names already
    /// tracked are skipped, so a key is never registered twice.
    pub fn add_selected(
        &mut self,
        kind: EntityKind,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Vec<Command> {
        let mut commands = Vec::new();
        for name in names {
            let key = EntityKey::new(kind, name);
            if self.entries.contains_key(&key) {
                continue;
            }
            let index = self.next_index;
            self.next_index += 1;
            self.entries.insert(key.clone(), Subscription { index, render: None });
            commands.push(Command::Register(key.clone()));
            commands.push(Command::Plan(key));
        }
        commands
    }

    /// Reshape the board to exactly `selected`, in that order.
    ///
    /// Rows that fell out of the selection are unregistered and their
    /// drawings removed. New rows behave as in `add_selected`. Kept
    /// rows keep their render handle and are renumbered to their new
    /// position; duplicates in `selected` collapse to the first
    /// occurrence.
    pub fn rebuild(
        &mut self,
        selected: &[EntityKey],
        renderer: &mut dyn RenderAdapter,
    ) -> Vec<Command> {
        let mut wanted: IndexSet<EntityKey> = IndexSet::with_capacity(selected.len());
        for key in selected {
            wanted.insert(key.clone());
        }

        let mut commands = Vec::new();

        // Drop rows that fell out of the selection.
        let removed: Vec<EntityKey> = self
            .entries
            .keys()
            .filter(|key| !wanted.contains(*key))
            .cloned()
            .collect();
        for key in removed {
            if let Some(sub) = self.entries.shift_remove(&key) {
                if let Some(handle) = sub.render {
                    renderer.remove_row(handle);
                }
                commands.push(Command::Unregister(key));
            }
        }

        // Renumber survivors and fold in the additions.
        let mut rebuilt = IndexMap::with_capacity(wanted.len());
        for (position, key) in wanted.iter().enumerate() {
            let index = position as u64;
            match self.entries.shift_remove(key) {
                Some(mut sub) => {
                    if sub.index != index {
                        if let Some(handle) = sub.render {
                            renderer.move_row(handle, index);
                        }
                        sub.index = index;
                    }
                    rebuilt.insert(key.clone(), sub);
                }
                None => {
                    commands.push(Command::Register(key.clone()));
                    commands.push(Command::Plan(key.clone()));
                    rebuilt.insert(key.clone(), Subscription { index, render: None });
                }
            }
        }
        self.entries = rebuilt;
        self.next_index = self.entries.len() as u64;
        commands
    }

    /// Route plan data to the rows that track it.
    ///
    /// The first delivery for a row draws it and records the handle;
    /// later deliveries update the existing drawing. Data for keys the
    /// board does not track is normal traffic and is dropped quietly.
    pub fn apply_plan(&mut self, update: PlanUpdate, renderer: &mut dyn RenderAdapter) {
        for (key, plan) in update.into_entries() {
            let Some(sub) = self.entries.get_mut(&key) else {
                trace!(%key, "dropping plan data for an untracked key");
                continue;
            };
            match sub.render {
                Some(handle) => renderer.update_row(handle, &key, &plan),
                None => sub.render = Some(renderer.draw_row(sub.index, &key, &plan)),
            }
        }
    }

    /// Replay the register/plan pairs for every tracked row.
    ///
    /// Used after a reconnect: the new session knows nothing about our
    /// rows, but indices and handles stay as they are.
    pub fn reannounce(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.entries.len() * 2);
        for key in self.entries.keys() {
            commands.push(Command::Register(key.clone()));
            commands.push(Command::Plan(key.clone()));
        }
        commands
    }
}
